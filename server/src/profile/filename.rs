//! Safe File Name Resolution
//!
//! Maps the authenticated user ID plus a sniffed extension to the stored
//! file name. The name is built entirely from server-known values, so no
//! client-controlled path component can reach the file system.

use uuid::Uuid;

/// Per-entry-point extension policy: fixed allow-list plus the fallback
/// used when the detected extension is not a member.
#[derive(Debug, Clone, Copy)]
pub struct ExtensionPolicy {
    allowed: &'static [&'static str],
    fallback: &'static str,
}

/// Policy for direct multipart uploads.
pub const UPLOAD_POLICY: ExtensionPolicy = ExtensionPolicy {
    allowed: &["png", "jpg", "jpeg", "gif"],
    fallback: "png",
};

/// Policy for fetch-from-URL uploads. `svg` stays in the list even though
/// magic-byte sniffing cannot currently produce it.
pub const REMOTE_POLICY: ExtensionPolicy = ExtensionPolicy {
    allowed: &["jpg", "jpeg", "png", "svg", "gif"],
    fallback: "jpg",
};

impl ExtensionPolicy {
    /// Select a safe extension: the detected one (lower-cased) when it is
    /// on the allow-list, the fixed fallback otherwise.
    #[must_use]
    pub fn select(&self, detected: &str) -> &'static str {
        let lower = detected.to_lowercase();
        self.allowed
            .iter()
            .find(|&&ext| ext == lower)
            .copied()
            .unwrap_or(self.fallback)
    }
}

/// Build the stored file name: `<user_id>.<extension>`.
///
/// Deterministic per user and extension, so a re-upload overwrites the
/// previous file at the same path.
#[must_use]
pub fn resolve_file_name(user_id: Uuid, detected_ext: &str, policy: &ExtensionPolicy) -> String {
    format!("{user_id}.{}", policy.select(detected_ext))
}
