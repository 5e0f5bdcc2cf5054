//! Shared encoding helpers for fixed-width byte material.
//!
//! Keys and chameleon parameters travel as fixed-width hex fields; addresses
//! and signatures are 64-byte arrays, which serde does not derive for.

use crate::error::{ClientError, ClientResult};

/// Decode one fixed-width hex field into `N` bytes.
///
/// `name` only feeds the error message.
pub fn decode_hex_field<const N: usize>(field: &str, name: &str) -> ClientResult<[u8; N]> {
    if field.len() != N * 2 {
        return Err(ClientError::Decoding(format!(
            "{name}: expected {} hex characters, got {}",
            N * 2,
            field.len()
        )));
    }
    let bytes =
        hex::decode(field).map_err(|e| ClientError::Decoding(format!("{name}: {e}")))?;
    let mut out = [0u8; N];
    out.copy_from_slice(&bytes);
    Ok(out)
}

/// Read a key/parameter file into its whitespace-separated fields.
pub fn read_fields(path: &std::path::Path) -> ClientResult<Vec<String>> {
    let content = std::fs::read_to_string(path)
        .map_err(|e| ClientError::Resolution(format!("{}: {e}", path.display())))?;
    Ok(content.split_whitespace().map(str::to_string).collect())
}

/// Write fields to a file, one per line.
pub fn write_fields(path: &std::path::Path, fields: &[String]) -> ClientResult<()> {
    let mut content = fields.join("\n");
    content.push('\n');
    std::fs::write(path, content)
        .map_err(|e| ClientError::Resolution(format!("{}: {e}", path.display())))?;

    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        std::fs::set_permissions(path, std::fs::Permissions::from_mode(0o600))
            .map_err(|e| ClientError::Resolution(format!("{}: {e}", path.display())))?;
    }

    Ok(())
}

/// Serde adapter for `[u8; 64]` fields.
pub mod bytes64 {
    use serde::de::Error as _;
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(bytes: &[u8; 64], serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_seq(bytes.iter())
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<[u8; 64], D::Error> {
        let v: Vec<u8> = Vec::deserialize(deserializer)?;
        v.try_into()
            .map_err(|v: Vec<u8>| D::Error::custom(format!("expected 64 bytes, got {}", v.len())))
    }
}
