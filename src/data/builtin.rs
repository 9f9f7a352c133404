use crate::models::{Choice, Question};

pub(super) fn questions() -> Vec<Question> {
    vec![
        Question::new(
            "What is the capital of France?",
            ["Paris", "London", "Berlin", "Madrid"],
            Choice::A,
        ),
        Question::new(
            "Which planet is known as the Red Planet?",
            ["Venus", "Mars", "Jupiter", "Saturn"],
            Choice::B,
        ),
        Question::new(
            "What is 7 multiplied by 8?",
            ["54", "58", "56", "64"],
            Choice::C,
        ),
        Question::new(
            "Which protocol guarantees ordered byte delivery?",
            ["UDP", "ICMP", "ARP", "TCP"],
            Choice::D,
        ),
        Question::new(
            "Who wrote the play Hamlet?",
            ["Charles Dickens", "William Shakespeare", "Jane Austen", "Mark Twain"],
            Choice::B,
        ),
    ]
}
