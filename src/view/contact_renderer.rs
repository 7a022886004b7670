use std::io;

use ramhorns::Template;

use crate::contact::form::{ContactForm, FormStatus, RENDERED_AT_FIELD, SEED_FIELD};
use crate::view::{parse_template, SiteInfo};

#[derive(ramhorns::Content)]
struct ViewField<'a> {
    field_name: &'a str,
    value: &'a str,
}

#[derive(ramhorns::Content)]
struct ViewContact<'a> {
    site_title: &'a str,
    seed_field: &'a str,
    seed: String,
    rendered_at_field: &'a str,
    rendered_at: String,
    name: ViewField<'a>,
    email: ViewField<'a>,
    subject: ViewField<'a>,
    message: ViewField<'a>,
    honeypot_field: &'a str,
    confirm_field: &'a str,
    submitted: bool,
    failed: bool,
    status_message: &'a str,
}

/// Renders the contact form under the field names of its seed. Typed values
/// survive a rejected submission so the visitor can retry.
pub struct ContactRenderer<'a> {
    pub template: Template<'a>,
}

impl ContactRenderer<'_> {
    pub fn new(contact_tpl_src: &str) -> io::Result<ContactRenderer> {
        Ok(ContactRenderer {
            template: parse_template(contact_tpl_src, "contact")?,
        })
    }

    pub fn render(&self, site: &SiteInfo, form: &ContactForm) -> String {
        let names = &form.names;
        let values = &form.values;
        self.template.render(&ViewContact {
            site_title: site.title,
            seed_field: SEED_FIELD,
            seed: form.seed.to_string(),
            rendered_at_field: RENDERED_AT_FIELD,
            rendered_at: form.rendered_at_millis().to_string(),
            name: ViewField { field_name: &names.name, value: &values.name },
            email: ViewField { field_name: &names.email, value: &values.email },
            subject: ViewField { field_name: &names.subject, value: &values.subject },
            message: ViewField { field_name: &names.message, value: &values.message },
            honeypot_field: &names.honeypot,
            confirm_field: &names.confirm,
            submitted: form.status == FormStatus::Submitted,
            failed: form.status == FormStatus::Error,
            status_message: form.status_message().unwrap_or_default(),
        })
    }
}
