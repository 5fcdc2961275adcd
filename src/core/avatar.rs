//! Default profile pictures
//!
//! New accounts get a deterministic Gravatar identicon derived from the
//! username, so every user has a stable avatar without uploading anything.

use sha2::{Digest, Sha256};

/// Build the default avatar URL for a username
pub fn default_avatar_url(username: &str) -> String {
    let digest = Sha256::digest(username.trim().to_lowercase().as_bytes());
    format!(
        "https://www.gravatar.com/avatar/{}?d=identicon&s=200",
        hex::encode(digest)
    )
}
