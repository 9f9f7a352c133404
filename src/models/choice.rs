use std::fmt;

/// One of the four answer letters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Choice {
    A,
    B,
    C,
    D,
}

impl Choice {
    pub const ALL: [Choice; 4] = [Choice::A, Choice::B, Choice::C, Choice::D];

    pub fn from_index(index: usize) -> Option<Self> {
        Self::ALL.get(index).copied()
    }

    /// Parse a single answer letter, ignoring case.
    pub fn from_letter(letter: &str) -> Option<Self> {
        let mut chars = letter.chars();
        let (Some(c), None) = (chars.next(), chars.next()) else {
            return None;
        };

        match c.to_ascii_lowercase() {
            'a' => Some(Choice::A),
            'b' => Some(Choice::B),
            'c' => Some(Choice::C),
            'd' => Some(Choice::D),
            _ => None,
        }
    }

    pub fn index(self) -> usize {
        self as usize
    }

    pub fn letter(self) -> char {
        match self {
            Choice::A => 'a',
            Choice::B => 'b',
            Choice::C => 'c',
            Choice::D => 'd',
        }
    }
}

impl fmt::Display for Choice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.letter())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_letter() {
        assert_eq!(Choice::from_letter("a"), Some(Choice::A));
        assert_eq!(Choice::from_letter("D"), Some(Choice::D));
        assert_eq!(Choice::from_letter("e"), None);
        assert_eq!(Choice::from_letter("ab"), None);
        assert_eq!(Choice::from_letter(""), None);
    }

    #[test]
    fn test_index_and_letter_agree() {
        for (i, choice) in Choice::ALL.iter().enumerate() {
            assert_eq!(choice.index(), i);
            assert_eq!(Choice::from_index(i), Some(*choice));
        }
        assert_eq!(Choice::from_index(4), None);
        assert_eq!(Choice::C.to_string(), "c");
    }
}
