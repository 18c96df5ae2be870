use crate::models::{
    ActorStamp, DateTime, FileCategory, RequiredFiles, SubmissionRecord, VerificationStatus,
    status_display,
};
use std::fmt::{self, Display, Formatter};

/// Escape text for use in HTML element content and quoted attribute values.
pub fn escape_html(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    for c in input.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            c => out.push(c),
        }
    }
    out
}

/// A printable summary of one submission.
///
/// Every value taken from the record is escaped when rendered; the only
/// unescaped text is the fixed markup of the template itself.
pub struct Report<'a> {
    /// The submission to print
    pub record: &'a SubmissionRecord,
    /// The required lists for the submission's job type
    pub required: &'a RequiredFiles,
    /// Name of the person printing the report
    pub printed_by: &'a str,
    /// When the report was produced
    pub printed_at: DateTime,
}

/// Render the report to a complete HTML document.
pub fn render_report(
    record: &SubmissionRecord,
    required: &RequiredFiles,
    printed_by: &str,
    printed_at: DateTime,
) -> String {
    Report {
        record,
        required,
        printed_by,
        printed_at,
    }
    .to_string()
}

fn row(f: &mut Formatter<'_>, label: &str, value: &str) -> fmt::Result {
    writeln!(
        f,
        "<tr><th>{}</th><td>{}</td></tr>",
        escape_html(label),
        escape_html(value)
    )
}

fn stamp_row(f: &mut Formatter<'_>, label: &str, stamp: Option<&ActorStamp>) -> fmt::Result {
    match stamp {
        Some(stamp) => row(f, label, &format!("{} ({})", stamp.at, stamp.by)),
        None => Ok(()),
    }
}

fn verification_label(status: VerificationStatus) -> &'static str {
    match status {
        VerificationStatus::Pending => "Menunggu",
        VerificationStatus::Approved => "Sesuai",
        VerificationStatus::Rejected => "Tidak Sesuai",
    }
}

impl Report<'_> {
    fn files(&self, f: &mut Formatter<'_>, category: FileCategory, title: &str) -> fmt::Result {
        let keys = self.required.for_category(category);
        if keys.is_empty() {
            return Ok(());
        }
        writeln!(f, "<h2>{}</h2>", escape_html(title))?;
        writeln!(
            f,
            "<table class=\"files\"><tr><th>Dokumen</th><th>Berkas</th><th>Status</th><th>Catatan</th></tr>"
        )?;
        for key in keys {
            match self.record.files.iter().find(|file| file.matches(key, category)) {
                Some(file) => writeln!(
                    f,
                    "<tr class=\"{}\"><td>{}</td><td>{}</td><td>{}</td><td>{}</td></tr>",
                    file.verification_status,
                    escape_html(key),
                    escape_html(&file.file_name),
                    verification_label(file.verification_status),
                    escape_html(file.verification_notes.as_deref().unwrap_or("")),
                )?,
                None => writeln!(
                    f,
                    "<tr class=\"missing\"><td>{}</td><td colspan=\"3\">Belum diunggah</td></tr>",
                    escape_html(key),
                )?,
            }
        }
        writeln!(f, "</table>")
    }
}

impl Display for Report<'_> {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        let record = self.record;
        let status = status_display(record.status.as_str());

        writeln!(f, "<!DOCTYPE html>")?;
        writeln!(f, "<html lang=\"id\"><head><meta charset=\"utf-8\">")?;
        writeln!(
            f,
            "<title>Pengajuan {}</title>",
            escape_html(&record.employee.name)
        )?;
        writeln!(f, "</head><body>")?;
        writeln!(f, "<h1>Laporan Pengajuan</h1>")?;
        writeln!(
            f,
            "<p class=\"status {}\">{}</p>",
            status.style.class(),
            escape_html(&status.label)
        )?;

        writeln!(f, "<table class=\"summary\">")?;
        row(f, "Nama", &record.employee.name)?;
        row(f, "NIP", &record.employee.nip)?;
        row(f, "Jabatan", &record.employee.position)?;
        row(f, "Jenis Jabatan", &record.job_type)?;
        row(f, "Dibuat", &record.created_at.to_string())?;
        if let Some(notes) = &record.notes {
            row(f, "Catatan", notes)?;
        }
        if let Some(reason) = &record.rejection_reason {
            row(f, "Alasan Penolakan", reason)?;
        }
        let stamps = &record.stamps;
        stamp_row(f, "Diajukan", stamps.submitted.as_ref())?;
        stamp_row(f, "Disetujui", stamps.approved.as_ref())?;
        stamp_row(f, "Ditolak", stamps.rejected.as_ref())?;
        stamp_row(f, "Diajukan Admin Wilayah", stamps.admin_wilayah_submitted.as_ref())?;
        stamp_row(f, "Disetujui Admin Wilayah", stamps.admin_wilayah_approved.as_ref())?;
        stamp_row(f, "Ditolak Admin Wilayah", stamps.admin_wilayah_rejected.as_ref())?;
        stamp_row(f, "Disetujui Final", stamps.final_approved.as_ref())?;
        stamp_row(f, "Ditolak Final", stamps.final_rejected.as_ref())?;
        writeln!(f, "</table>")?;

        self.files(f, FileCategory::Kabupaten, "Dokumen Kabupaten")?;
        self.files(f, FileCategory::AdminWilayah, "Dokumen Admin Wilayah")?;

        writeln!(
            f,
            "<footer>Dicetak oleh {} pada {}</footer>",
            escape_html(self.printed_by),
            self.printed_at
        )?;
        writeln!(f, "</body></html>")
    }
}
