//! HTML for the contact page

use super::faq::FAQS;
use crate::forms::{AppointmentForm, ContactForm, Notification};
use crate::validation::ValidationResult;

pub struct PageView<'a> {
    pub product_name: &'a str,
    pub faq_url: &'a str,
    pub appointment: &'a AppointmentForm,
    pub contact: &'a ContactForm,
    pub notification: Option<&'a Notification>,
    pub appointment_errors: Option<&'a ValidationResult>,
}

pub fn escape_html(value: &str) -> String {
    let mut escaped = String::with_capacity(value.len());
    for c in value.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            _ => escaped.push(c),
        }
    }
    escaped
}

pub fn render_contact_page(view: &PageView<'_>) -> String {
    let mut html = String::with_capacity(16 * 1024);

    html.push_str(&format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head>
<meta charset="utf-8">
<meta name="viewport" content="width=device-width, initial-scale=1">
<title>Contact Us | {product}</title>
<style>{style}</style>
</head>
<body>
<main class="page">
"#,
        product = escape_html(view.product_name),
        style = STYLE,
    ));

    if let Some(notification) = view.notification {
        html.push_str(&render_notification(notification));
    }

    html.push_str(&render_hero());
    html.push_str(r#"<section class="forms"><div class="cards">"#);
    html.push_str(&render_appointment_card(view.appointment, view.appointment_errors));
    html.push_str(&render_contact_card(view.contact));
    html.push_str("</div></section>\n");
    html.push_str(&render_faq(view.faq_url));
    html.push_str(&render_call_to_action());
    html.push_str("</main>\n");
    html.push_str(SUBMIT_GATE_SCRIPT);
    html.push_str("</body>\n</html>\n");

    html
}

fn render_notification(notification: &Notification) -> String {
    let class = if notification.is_success() { "success" } else { "failure" };
    format!(
        r#"<dialog open class="alert {class}" role="alertdialog" aria-modal="true" data-kind="{kind}">
<form method="dialog"><p>{message}</p><button type="submit">OK</button></form>
</dialog>
"#,
        class = class,
        kind = notification.kind(),
        message = escape_html(&notification.message()),
    )
}

fn render_hero() -> String {
    r#"<section class="hero">
<h1>Contact Us</h1>
<p>Have questions about our LMS platform? We&apos;re here to help you find the right solution for your educational needs.</p>
</section>
"#
    .to_string()
}

fn text_input(id: &str, name: &str, input_type: &str, placeholder: &str, value: &str, required: bool) -> String {
    format!(
        r#"<input id="{id}" name="{name}" type="{input_type}" placeholder="{placeholder}" value="{value}"{required}>"#,
        id = id,
        name = name,
        input_type = input_type,
        placeholder = placeholder,
        value = escape_html(value),
        required = if required { " required" } else { "" },
    )
}

fn field_errors(errors: Option<&ValidationResult>, field: &str) -> String {
    errors
        .and_then(|result| result.errors.get(field))
        .map(|messages| {
            messages
                .iter()
                .map(|message| format!(r#"<p class="field-error">{}</p>"#, escape_html(message)))
                .collect::<String>()
        })
        .unwrap_or_default()
}

fn render_appointment_card(form: &AppointmentForm, errors: Option<&ValidationResult>) -> String {
    let fields = form.fields();
    let min_date = form.min_date().format("%Y-%m-%d").to_string();

    format!(
        r#"<div class="card" id="appointment">
<div class="card-header"><h2>Schedule a Consultation</h2>
<p>Book a personalized session with our education experts</p></div>
<form method="post" action="/contact/appointment" class="card-body">
<label for="appointment-name">Your Name</label>
{name}{name_errors}
<label for="appointment-email">Email Address</label>
{email}{email_errors}
<label for="date">Select Date</label>
<input type="date" id="date" name="date" value="{date}" min="{min_date}" required>{date_errors}
<label for="time">Enter Time (24-hour format, e.g., 14:30)</label>
<input type="time" id="time" name="time" value="{time}" placeholder="HH:mm" required>{time_errors}
<p class="hint">Available hours: 09:00 - 17:00</p>
<button type="submit" class="primary" data-submit-enabled="{enabled}"{disabled}>Schedule Consultation</button>
</form>
</div>
"#,
        name = text_input("appointment-name", "name", "text", "Enter your name", &fields.name, true),
        name_errors = field_errors(errors, "name"),
        email = text_input("appointment-email", "email", "email", "Enter your email", &fields.email, true),
        email_errors = field_errors(errors, "email"),
        date = escape_html(&fields.date),
        min_date = min_date,
        date_errors = field_errors(errors, "date"),
        time = escape_html(&fields.time),
        time_errors = field_errors(errors, "time"),
        enabled = form.submit_enabled(),
        disabled = if form.submit_enabled() { "" } else { " disabled" },
    )
}

fn render_contact_card(form: &ContactForm) -> String {
    let fields = form.fields();

    format!(
        r#"<div class="card" id="message">
<div class="card-header"><h2>Send Message</h2>
<p>We'll get back to you as soon as possible</p></div>
<form method="post" action="/contact/message" class="card-body">
<div class="row">
<div><label for="first-name">First Name*</label>{first_name}</div>
<div><label for="last-name">Last Name*</label>{last_name}</div>
</div>
<label for="email">Email*</label>
{email}
<label for="subject">Subject*</label>
{subject}
<label for="message-body">How can we help?*</label>
<textarea id="message-body" name="message" placeholder="Message" rows="5">{message}</textarea>
<button type="submit" class="primary">Submit</button>
</form>
</div>
"#,
        first_name = text_input("first-name", "first_name", "text", "First Name", &fields.first_name, false),
        last_name = text_input("last-name", "last_name", "text", "Last Name", &fields.last_name, false),
        email = text_input("email", "email", "email", "Email Address", &fields.email, false),
        subject = text_input("subject", "subject", "text", "Subject", &fields.subject, false),
        message = escape_html(&fields.message),
    )
}

fn render_faq(faq_url: &str) -> String {
    let items: String = FAQS
        .iter()
        .map(|faq| {
            format!(
                "<div class=\"faq\"><h3>{}</h3><p>{}</p></div>\n",
                escape_html(faq.question),
                escape_html(faq.answer)
            )
        })
        .collect();

    format!(
        r#"<section class="faqs">
<h2>Frequently Asked Questions</h2>
<p>Find quick answers to common questions about our LMS platform.</p>
<div class="faq-grid">
{items}</div>
<a class="more" href="{faq_url}">View all FAQs</a>
</section>
"#,
        items = items,
        faq_url = escape_html(faq_url),
    )
}

fn render_call_to_action() -> String {
    r##"<section class="cta">
<div class="cta-panel">
<h2>Got More Questions? <span class="accent">Reach Out</span></h2>
<p>Our team of education experts is ready to help you find the perfect learning solution.</p>
<a class="primary" href="#appointment">Schedule a Call</a>
</div>
</section>
"##
    .to_string()
}

/// Keeps the appointment button's `disabled` state in step with the four
/// required fields as the visitor types.
const SUBMIT_GATE_SCRIPT: &str = r#"<script>
(function () {
  var form = document.querySelector('#appointment form');
  if (!form) return;
  var button = form.querySelector('button[type="submit"]');
  var names = ['name', 'email', 'date', 'time'];
  function sync() {
    var complete = names.every(function (n) { return form.elements[n].value !== ''; });
    button.disabled = !complete;
    button.dataset.submitEnabled = String(complete);
  }
  form.addEventListener('input', sync);
  sync();
})();
</script>
"#;

const STYLE: &str = "\
body{margin:0;font-family:system-ui,sans-serif;color:#111827;background:#FAFAF7}\
.hero{padding:6rem 1rem;text-align:center;background:#F5F5ED}\
.hero h1{font-size:3rem;margin:0 0 1.5rem}\
.forms{padding:5rem 1rem}\
.cards{display:grid;grid-template-columns:repeat(auto-fit,minmax(320px,1fr));gap:2.5rem;max-width:72rem;margin:0 auto}\
.card{background:#fff;border-radius:1rem;box-shadow:0 10px 15px rgba(0,0,0,.1);overflow:hidden}\
.card-header{padding:2rem;border-bottom:1px solid #f3f4f6}\
.card-body{padding:2rem;display:flex;flex-direction:column;gap:.75rem}\
.row{display:grid;grid-template-columns:1fr 1fr;gap:1.5rem}\
input,textarea{width:100%;box-sizing:border-box;padding:.75rem 1rem;border:1px solid #e5e7eb;border-radius:.5rem}\
.field-error{color:#b91c1c;margin:0;font-size:.875rem}\
.hint{color:#6b7280;font-size:.875rem}\
.primary{display:inline-block;background:#FFB333;color:#fff;border:0;padding:1rem 1.5rem;border-radius:.5rem;text-decoration:none;font-weight:500;cursor:pointer}\
.primary:hover{background:#F87239}\
.primary:disabled{opacity:.5;cursor:not-allowed}\
.faqs{padding:5rem 1rem;text-align:center;background:#F5F5ED}\
.faq-grid{display:grid;grid-template-columns:repeat(auto-fit,minmax(280px,1fr));gap:1.5rem;max-width:56rem;margin:3rem auto 2rem;text-align:left}\
.faq{border:1px solid #e5e7eb;border-radius:.75rem;padding:1.5rem;background:#fff}\
.more,.accent{color:#F87239}\
.cta{padding:5rem 1rem}\
.cta-panel{max-width:64rem;margin:0 auto;border-radius:1rem;background:#232323;color:#fff;padding:4rem;text-align:center}\
.alert{border:0;border-radius:.75rem;box-shadow:0 20px 25px rgba(0,0,0,.25);padding:1.5rem}\
.alert.failure p{color:#b91c1c}\
";
