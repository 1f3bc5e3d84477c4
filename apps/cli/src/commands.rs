//! Command handlers. Each writes its report to `out` and says whether the operation succeeded.

use anyhow::Result;
use penmark::licensing::{
    ActivationOutcome, ConsumeOutcome, LicenseCheck, Licensing, OrganizationLicense, Verdict,
};
use serde_json::json;
use std::io::Write;

/// Whether a command achieved what was asked; maps onto the process exit status.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    Success,
    /// The key or the license said no. Exit status 2.
    Rejected,
}

impl Outcome {
    #[must_use]
    pub const fn exit_code(self) -> u8 {
        match self {
            Self::Success => 0,
            Self::Rejected => 2,
        }
    }
}

/// Decodes `key` and reports its verdict.
///
/// # Errors
/// Returns an error if writing the report fails.
pub fn verify(
    licensing: &Licensing,
    key: &str,
    json: bool,
    out: &mut impl Write,
) -> Result<Outcome> {
    let check = licensing.check(key);
    write_check(&check, json, out)?;
    Ok(if check.is_valid() { Outcome::Success } else { Outcome::Rejected })
}

/// Activates `key`, replacing the current license when the key is valid.
///
/// # Errors
/// Returns an error if the license record cannot be persisted or the report cannot be written.
pub fn activate(
    licensing: &Licensing,
    key: &str,
    json: bool,
    out: &mut impl Write,
) -> Result<Outcome> {
    match licensing.activate(key)? {
        ActivationOutcome::Activated(record) => {
            if json {
                writeln!(out, "{}", serde_json::to_string_pretty(&record)?)?;
            } else {
                writeln!(out, "License activated successfully")?;
                write_record(&record, out)?;
            }
            Ok(Outcome::Success)
        },
        ActivationOutcome::Rejected(check) => {
            if json {
                write_check(&check, true, out)?;
            } else {
                writeln!(
                    out,
                    "Invalid license key. Please check and try again. ({})",
                    verdict_label(&check)
                )?;
            }
            Ok(Outcome::Rejected)
        },
    }
}

/// Reports the current license and its usage.
///
/// # Errors
/// Returns an error if the report cannot be written.
pub fn status(licensing: &Licensing, json: bool, out: &mut impl Write) -> Result<Outcome> {
    let record = licensing.current();
    let summary = licensing.summary();

    if json {
        let report = json!({ "license": record, "summary": summary });
        writeln!(out, "{}", serde_json::to_string_pretty(&report)?)?;
        return Ok(Outcome::Success);
    }

    if !record.is_active {
        writeln!(out, "No active license")?;
        return Ok(Outcome::Success);
    }

    write_record(&record, out)?;
    writeln!(
        out,
        "Usage:         {}/{} documents ({}%), {} remaining",
        summary.used_documents,
        summary.total_documents,
        summary.usage_percent,
        summary.remaining_documents
    )?;
    if summary.is_expired {
        writeln!(out, "Validity:      Expired")?;
    } else {
        writeln!(
            out,
            "Validity:      {} days remaining ({}% elapsed)",
            summary.remaining_days, summary.time_percent
        )?;
    }
    Ok(Outcome::Success)
}

/// Spends one document of quota.
///
/// # Errors
/// Returns an error if the updated record cannot be persisted or the report cannot be written.
pub fn consume(licensing: &Licensing, json: bool, out: &mut impl Write) -> Result<Outcome> {
    match licensing.consume_one_document()? {
        ConsumeOutcome::Consumed { used_documents, remaining_documents } => {
            if json {
                let report = json!({
                    "usedDocuments": used_documents,
                    "remainingDocuments": remaining_documents,
                });
                writeln!(out, "{report}")?;
            } else {
                writeln!(
                    out,
                    "Document recorded: {used_documents} used, {remaining_documents} remaining"
                )?;
            }
            Ok(Outcome::Success)
        },
        ConsumeOutcome::Refused(refusal) => {
            if json {
                writeln!(out, "{}", json!({ "refused": refusal, "message": refusal.to_string() }))?;
            } else {
                writeln!(out, "{refusal}")?;
            }
            Ok(Outcome::Rejected)
        },
    }
}

/// Issues a new key.
///
/// # Errors
/// Returns an error if the request is invalid or the report cannot be written.
#[cfg(feature = "issuance")]
pub fn issue(
    org: &str,
    days: u32,
    documents: u64,
    json: bool,
    out: &mut impl Write,
) -> Result<Outcome> {
    use penmark::kernel::clock::SystemClock;
    use penmark::licensing::generator::{IssueRequest, issue_key};

    let issued = issue_key(&IssueRequest::new(org, days, documents), &SystemClock)?;
    if json {
        writeln!(out, "{}", json!({ "key": issued.key, "payload": issued.payload }))?;
    } else {
        writeln!(out, "{}", issued.key)?;
    }
    Ok(Outcome::Success)
}

fn verdict_label(check: &LicenseCheck) -> String {
    match check.verdict {
        Verdict::Malformed(reason) => format!("{} ({reason})", check.verdict),
        verdict => verdict.to_string(),
    }
}

fn write_check(check: &LicenseCheck, json: bool, out: &mut impl Write) -> Result<()> {
    if json {
        let reason = match check.verdict {
            Verdict::Malformed(reason) => Some(reason.to_string()),
            _ => None,
        };
        let report = json!({
            "verdict": check.verdict.to_string(),
            "reason": reason,
            "payload": check.payload,
        });
        writeln!(out, "{}", serde_json::to_string_pretty(&report)?)?;
        return Ok(());
    }

    writeln!(out, "Verdict:       {}", verdict_label(check))?;
    if let Some(payload) = &check.payload {
        writeln!(out, "Organization:  {}", payload.organization_id)?;
        writeln!(out, "Expires:       {}", payload.expiry.to_rfc3339())?;
        writeln!(out, "Documents:     {}", payload.document_quota)?;
    }
    Ok(())
}

fn write_record(record: &OrganizationLicense, out: &mut impl Write) -> Result<()> {
    writeln!(out, "License key:   {}", record.license_key)?;
    writeln!(out, "Issued:        {}", record.issued_date.to_rfc3339())?;
    writeln!(out, "Expires:       {}", record.expiry_date.to_rfc3339())?;
    writeln!(out, "Documents:     {}", record.total_documents)?;
    writeln!(out, "Features:      {}", record.features.join(", "))?;
    Ok(())
}
