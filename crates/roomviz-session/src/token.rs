// SPDX-FileCopyrightText: 2026 Roomviz Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Session token synthesis: base-36 millisecond timestamp plus a random suffix.

use chrono::{DateTime, Utc};
use rand::Rng;
use roomviz_core::SessionToken;

const ALPHABET: &[u8; 36] = b"0123456789abcdefghijklmnopqrstuvwxyz";

/// Length of the random part appended to the timestamp prefix.
pub const RANDOM_SUFFIX_LEN: usize = 11;

/// Creates a new token for `now`. Collision resistance is birthday-bound only.
pub fn generate(now: DateTime<Utc>) -> SessionToken {
    generate_with(now, &mut rand::thread_rng())
}

pub fn generate_with<R: Rng + ?Sized>(now: DateTime<Utc>, rng: &mut R) -> SessionToken {
    let mut token = to_base36(now.timestamp_millis().max(0) as u64);
    token.extend(
        (0..RANDOM_SUFFIX_LEN).map(|_| ALPHABET[rng.gen_range(0..ALPHABET.len())] as char),
    );
    SessionToken(token)
}

fn to_base36(mut value: u64) -> String {
    if value == 0 {
        return "0".to_string();
    }
    let mut digits = Vec::new();
    while value > 0 {
        digits.push(ALPHABET[(value % 36) as usize]);
        value /= 36;
    }
    digits.reverse();
    String::from_utf8(digits).unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use chrono::TimeZone;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    use super::*;

    #[test]
    fn base36_matches_known_values() {
        assert_eq!(to_base36(0), "0");
        assert_eq!(to_base36(35), "z");
        assert_eq!(to_base36(36), "10");
        assert_eq!(to_base36(1_700_000_000_000), "loyw3v28");
    }

    #[test]
    fn token_is_timestamp_prefix_plus_suffix() {
        let now = Utc.timestamp_millis_opt(1_700_000_000_000).unwrap();
        let token = generate_with(now, &mut StdRng::seed_from_u64(7));
        assert!(token.as_str().starts_with("loyw3v28"));
        assert_eq!(token.as_str().len(), "loyw3v28".len() + RANDOM_SUFFIX_LEN);
        assert!(
            token
                .as_str()
                .bytes()
                .all(|b| b.is_ascii_digit() || b.is_ascii_lowercase())
        );
    }

    #[test]
    fn consecutive_tokens_differ() {
        let now = Utc::now();
        assert_ne!(generate(now), generate(now));
    }
}
