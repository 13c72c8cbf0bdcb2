//! English cardinal number words.
//!
//! # Invariants
//! - Expansion is iterative; work is bounded by the number of emitted words.
//! - Output is lowercase and single-space separated.

const UNDER_20: [&str; 20] = [
    "zero",
    "one",
    "two",
    "three",
    "four",
    "five",
    "six",
    "seven",
    "eight",
    "nine",
    "ten",
    "eleven",
    "twelve",
    "thirteen",
    "fourteen",
    "fifteen",
    "sixteen",
    "seventeen",
    "eighteen",
    "nineteen",
];

const TENS: [&str; 8] = [
    "twenty", "thirty", "forty", "fifty", "sixty", "seventy", "eighty", "ninety",
];

/// Pivots in descending order.
const PIVOTS: [(u64, &str); 4] = [
    (1_000_000_000, "billion"),
    (1_000_000, "million"),
    (1_000, "thousand"),
    (100, "hundred"),
];

enum Pending {
    Number(u64),
    Word(&'static str),
}

/// Spells out `num` in English words, e.g. `123 -> "one hundred twenty three"`.
pub fn num2words(num: u64) -> String {
    let mut words: Vec<&'static str> = Vec::new();
    let mut stack = vec![Pending::Number(num)];

    while let Some(item) = stack.pop() {
        let n = match item {
            Pending::Word(word) => {
                words.push(word);
                continue;
            }
            Pending::Number(n) => n,
        };

        if n < 20 {
            words.push(UNDER_20[n as usize]);
        } else if n < 100 {
            words.push(TENS[(n / 10) as usize - 2]);
            if n % 10 != 0 {
                words.push(UNDER_20[(n % 10) as usize]);
            }
        } else {
            let (pivot, pivot_word) = PIVOTS
                .iter()
                .copied()
                .find(|(pivot, _)| *pivot <= n)
                .unwrap_or(PIVOTS[PIVOTS.len() - 1]);
            // Stack is LIFO: push in reverse emission order.
            if n % pivot != 0 {
                stack.push(Pending::Number(n % pivot));
            }
            stack.push(Pending::Word(pivot_word));
            stack.push(Pending::Number(n / pivot));
        }
    }

    words.join(" ")
}

#[cfg(test)]
mod tests {
    use super::num2words;

    #[test]
    fn small_numbers_use_lookup_table() {
        assert_eq!(num2words(0), "zero");
        assert_eq!(num2words(7), "seven");
        assert_eq!(num2words(19), "nineteen");
    }

    #[test]
    fn tens_combine_with_units() {
        assert_eq!(num2words(20), "twenty");
        assert_eq!(num2words(42), "forty two");
        assert_eq!(num2words(99), "ninety nine");
    }

    #[test]
    fn pivots_divide_and_omit_zero_remainder() {
        assert_eq!(num2words(100), "one hundred");
        assert_eq!(num2words(123), "one hundred twenty three");
        assert_eq!(num2words(1000), "one thousand");
        assert_eq!(num2words(2024), "two thousand twenty four");
        assert_eq!(num2words(1_000_001), "one million one");
        assert_eq!(
            num2words(123_456),
            "one hundred twenty three thousand four hundred fifty six"
        );
    }

    #[test]
    fn quotient_above_largest_pivot_is_expanded_again() {
        assert_eq!(num2words(5_000_000_000_000), "five thousand billion");
        assert!(num2words(u64::MAX).starts_with("eighteen billion four hundred forty six million"));
    }
}
