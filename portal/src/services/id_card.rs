// parish-portal/src/services/id_card.rs

//! Printable membership ID card, credit-card sized.

use crate::models::member::MemberRecord;
use chrono::NaiveDate;

const PHOTO_PLACEHOLDER: &str = "&#128100;";

const CARD_STYLE: &str = r#"
      body { margin: 0; padding: 20px; font-family: Arial, sans-serif; }
      .id-card {
        width: 3.375in; height: 2.125in; border: 2px solid #000; border-radius: 8px;
        overflow: hidden; background: linear-gradient(135deg, #4F46E5, #7C3AED);
        color: white; position: relative; padding: 16px; box-sizing: border-box;
      }
      .header { text-align: center; margin-bottom: 12px; }
      .header h2 { margin: 0; font-size: 14px; }
      .header p { margin: 2px 0; font-size: 10px; opacity: 0.9; }
      .content { display: flex; gap: 12px; }
      .photo {
        width: 60px; height: 60px; border: 2px solid white; border-radius: 6px;
        background: rgba(255,255,255,0.2); display: flex; align-items: center;
        justify-content: center; font-size: 24px;
      }
      .photo img { width: 100%; height: 100%; object-fit: cover; border-radius: 6px; }
      .info { flex: 1; font-size: 10px; }
      .info div { margin-bottom: 4px; }
      .label { opacity: 0.8; text-transform: uppercase; font-size: 8px; }
      .value { font-weight: bold; }
      .footer { position: absolute; bottom: 8px; right: 12px; font-size: 8px; opacity: 0.7; }
      .member-id {
        position: absolute; top: 8px; right: 12px; background: rgba(255,255,255,0.2);
        padding: 4px 8px; border-radius: 12px; font-size: 8px;
      }
      @media print {
        body { margin: 0; padding: 0; }
        .id-card { margin: 0; }
      }
"#;

pub fn escape_html(raw: &str) -> String {
  let mut out = String::with_capacity(raw.len());
  for c in raw.chars() {
    match c {
      '&' => out.push_str("&amp;"),
      '<' => out.push_str("&lt;"),
      '>' => out.push_str("&gt;"),
      '"' => out.push_str("&quot;"),
      '\'' => out.push_str("&#39;"),
      _ => out.push(c),
    }
  }
  out
}

pub fn render(record: &MemberRecord, organization: &str, issued_on: NaiveDate) -> String {
  let photo = match &record.submission.photo {
    Some(photo) => format!(r#"<img src="{}" alt="Photo" />"#, escape_html(&photo.to_data_url())),
    None => PHOTO_PLACEHOLDER.to_string(),
  };

  let info = [
    ("Name", record.name.clone()),
    ("DOB", record.date_of_birth.format("%Y-%m-%d").to_string()),
    ("Ministry", record.ministry.clone()),
    ("Status", record.sacrament_status.label().to_string()),
  ]
  .iter()
  .map(|(label, value)| {
    format!(
      r#"
          <div>
            <div class="label">{}</div>
            <div class="value">{}</div>
          </div>"#,
      label,
      escape_html(value)
    )
  })
  .collect::<String>();

  format!(
    r#"<!DOCTYPE html>
<html>
  <head>
    <meta charset="utf-8" />
    <title>ID Card - {name}</title>
    <style>{style}</style>
  </head>
  <body>
    <div class="id-card">
      <div class="member-id">{id}</div>
      <div class="header">
        <h2>{organization}</h2>
        <p>Member Identification Card</p>
      </div>
      <div class="content">
        <div class="photo">{photo}</div>
        <div class="info">{info}
        </div>
      </div>
      <div class="footer">Issued: {issued}</div>
    </div>
  </body>
</html>
"#,
    name = escape_html(&record.name),
    style = CARD_STYLE,
    id = escape_html(&record.id),
    organization = escape_html(organization),
    photo = photo,
    info = info,
    issued = issued_on.format("%Y-%m-%d"),
  )
}
