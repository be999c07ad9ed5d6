use crate::appointment::AppointmentSlot;
use crate::config::MailConfig;
use crate::models::ConsultationRequest;

use super::OutgoingMail;

/// Escapes text for inclusion in HTML-rendering mail clients.
pub fn escape_html(input: &str) -> String {
    let mut escaped = String::with_capacity(input.len());
    for ch in input.chars() {
        match ch {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#039;"),
            _ => escaped.push(ch),
        }
    }
    escaped
}

/// Header values must stay on one line.
pub fn sanitize_header(input: &str) -> String {
    input
        .chars()
        .map(|c| if c == '\r' || c == '\n' { ' ' } else { c })
        .collect::<String>()
        .trim()
        .to_string()
}

#[derive(Debug, Clone)]
pub struct ConsultationNotification<'a> {
    request: &'a ConsultationRequest,
    appointment: &'a AppointmentSlot,
    request_id: i64,
}

impl<'a> ConsultationNotification<'a> {
    pub fn new(request: &'a ConsultationRequest, appointment: &'a AppointmentSlot, request_id: i64) -> Self {
        Self {
            request,
            appointment,
            request_id,
        }
    }

    pub fn subject(&self) -> String {
        sanitize_header(&format!("New Consultation Request - {}", self.request.name))
    }

    pub fn body(&self) -> String {
        let r = self.request;
        let mut body = format!(
            "A client with the name {} has booked an appointment on {}.\n\n",
            escape_html(&r.name),
            self.appointment.display()
        );
        body.push_str("Contact Details:\n");
        body.push_str(&format!("Email: {}\n", escape_html(&r.email)));
        body.push_str(&format!("Phone: {}\n", escape_html(&r.phone)));
        body.push_str(&format!("Practice Area: {}\n\n", escape_html(&r.practice_area)));
        body.push_str(&format!("Message:\n{}\n\n", escape_html(&r.message)));
        body.push_str(&format!("Request ID: #{}", self.request_id));
        body
    }

    pub fn into_mail(self, config: &MailConfig) -> OutgoingMail {
        OutgoingMail {
            to: config.to_address.clone(),
            from: config.from_address.clone(),
            reply_to: sanitize_header(&self.request.email),
            subject: self.subject(),
            body: self.body(),
        }
    }
}
