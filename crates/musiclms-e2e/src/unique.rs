//! Generated identifiers for tests that create server-side records.
//!
//! Uniqueness is probabilistic; tests that create accounts use these so that
//! repeated runs against the same backend do not collide.

use rand::Rng;

const UPPER: &[u8] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZ";
const LETTERS: &[u8] = b"abcdefghijklmnopqrstuvwxyzABCDEFGHIJKLMNOPQRSTUVWXYZ";

fn pick(rng: &mut impl Rng, alphabet: &[u8], len: usize) -> String {
    (0..len)
        .map(|_| char::from(alphabet[rng.gen_range(0..alphabet.len())]))
        .collect()
}

/// Five random letters
#[must_use]
pub fn random_string() -> String {
    pick(&mut rand::thread_rng(), LETTERS, 5)
}

/// Five random digits
#[must_use]
pub fn random_number() -> String {
    pick(&mut rand::thread_rng(), b"0123456789", 5)
}

/// Three upper-case letters followed by three digits
#[must_use]
pub fn random_alphanumeric() -> String {
    let mut rng = rand::thread_rng();
    let mut id = pick(&mut rng, UPPER, 3);
    id.push_str(&pick(&mut rng, b"0123456789", 3));
    id
}

/// `test_<alnum>@musiclms.test`
#[must_use]
pub fn random_email() -> String {
    format!("test_{}@musiclms.test", random_alphanumeric().to_lowercase())
}

/// Assignment or resource title with a random suffix
#[must_use]
pub fn unique_title(prefix: &str) -> String {
    format!("{prefix} {}", random_alphanumeric())
}
