//! Volume identifier handling.

/// Rewrite a volume id into its filesystem-safe pairtree form.
///
/// The id splits at the first `.` into prefix and suffix; within the suffix,
/// `:` becomes `+`, `/` becomes `=`, and any remaining `.` becomes `,`.
/// The same form keys both text-blob paths and the metadata join.
pub fn clean_pairtree(htid: &str) -> String {
    match htid.split_once('.') {
        Some((prefix, suffix)) => {
            let suffix = suffix.replace(':', "+").replace('/', "=").replace('.', ",");
            format!("{prefix}.{suffix}")
        }
        None => htid.to_string(),
    }
}
