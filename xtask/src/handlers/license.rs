use anyhow::{Context, ensure};
use penmark_kernel::clock::SystemClock;
use penmark_licensing::generator::{IssueRequest, issue_key};
use std::fs;
use std::path::{Component, Path, PathBuf};

const OUTPUT_DIR: &str = "private/licenses";

/// Issues a license key and stores a copy under `private/licenses/<org>.key`.
///
/// # Errors
/// Returns an error if the order is invalid or the key file cannot be written.
pub fn generate_license(organization: &str, days: u32, documents: u64) -> anyhow::Result<()> {
    let request = IssueRequest::new(organization, days, documents);
    let issued = issue_key(&request, &SystemClock).context("Failed to issue license key")?;

    let file = key_file(Path::new(OUTPUT_DIR), &issued.payload.organization_id)?;
    fs::create_dir_all(OUTPUT_DIR).with_context(|| format!("Failed to create {OUTPUT_DIR}"))?;
    fs::write(&file, format!("{}\n", issued.key))
        .with_context(|| format!("Failed to write {}", file.display()))?;

    println!("✅ License issued for {}", issued.payload.organization_id);
    println!("   Expires:   {}", issued.payload.expiry.to_rfc3339());
    println!("   Documents: {}", issued.payload.document_quota);
    println!("   Key:       {}", issued.key);
    println!("   Saved to:  {}", file.display());

    Ok(())
}

/// `<dir>/<organization>.key`, refusing names that would leave `dir`.
fn key_file(dir: &Path, organization: &str) -> anyhow::Result<PathBuf> {
    let name = format!("{organization}.key");
    let mut components = Path::new(&name).components();
    ensure!(
        matches!((components.next(), components.next()), (Some(Component::Normal(_)), None)),
        "Organization id '{organization}' is not a plain file name"
    );
    Ok(dir.join(name))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn key_file_stays_in_the_output_directory() {
        let dir = Path::new(OUTPUT_DIR);
        assert_eq!(key_file(dir, "acme-corp").unwrap(), dir.join("acme-corp.key"));

        assert!(key_file(dir, "../evil").is_err());
        assert!(key_file(dir, "nested/acme").is_err());
        assert!(key_file(dir, "/etc/passwd").is_err());
    }
}
