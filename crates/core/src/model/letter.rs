//! Letter-coded answer keys.
//!
//! Exercises record their correct option as a single letter, `'A'` being the
//! first option. Only six options are addressable.

/// Highest addressable option letter.
pub const LAST_LETTER: char = 'F';

/// Number of options a letter key can address.
pub const MAX_OPTIONS: usize = 6;

/// Maps `'A'..='F'` to `0..=5`.
///
/// Anything else (lowercase, digits, later letters) has no index.
#[must_use]
pub fn letter_to_index(letter: char) -> Option<usize> {
    if ('A'..=LAST_LETTER).contains(&letter) {
        Some(letter as usize - 'A' as usize)
    } else {
        None
    }
}

/// Maps `0..=5` back to `'A'..='F'`.
#[must_use]
pub fn index_to_letter(index: usize) -> Option<char> {
    if index < MAX_OPTIONS {
        u8::try_from(index).ok().map(|i| char::from(b'A' + i))
    } else {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_letter_round_trips() {
        for letter in 'A'..=LAST_LETTER {
            let index = letter_to_index(letter).unwrap();
            assert_eq!(index_to_letter(index), Some(letter));
        }
    }

    #[test]
    fn first_and_last_letters_map_to_bounds() {
        assert_eq!(letter_to_index('A'), Some(0));
        assert_eq!(letter_to_index('F'), Some(5));
    }

    #[test]
    fn out_of_range_letters_have_no_index() {
        assert_eq!(letter_to_index('G'), None);
        assert_eq!(letter_to_index('a'), None);
        assert_eq!(letter_to_index('1'), None);
        assert_eq!(index_to_letter(6), None);
    }
}
