use super::error::UploadError;

pub const ORIGINAL_FILENAME_FIELD: &str = "original_filename";
pub const SAVED_FILENAME_FIELD: &str = "saved_filename";
/// Multipart field name carrying the file bytes.
pub const FILE_FIELD: &str = "file";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FormField {
    pub name: String,
    pub label: String,
    pub value: String,
    pub hidden: bool,
}

/// The form surrounding the file input. Field order is preserved when the
/// form is serialized.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UploadForm {
    fields: Vec<FormField>,
}

impl UploadForm {
    pub fn new() -> Self {
        Self::default()
    }

    /// Name and email inputs plus the two hidden filename fields.
    pub fn standard(name: &str, email: &str) -> Self {
        Self::new()
            .with_field("name", "Your Name", name)
            .with_field("email", "Your Email", email)
            .with_hidden(ORIGINAL_FILENAME_FIELD)
            .with_hidden(SAVED_FILENAME_FIELD)
    }

    pub fn with_field(mut self, name: &str, label: &str, value: &str) -> Self {
        self.fields.push(FormField {
            name: name.to_string(),
            label: label.to_string(),
            value: value.to_string(),
            hidden: false,
        });
        self
    }

    pub fn with_hidden(mut self, name: &str) -> Self {
        self.fields.push(FormField {
            name: name.to_string(),
            label: String::new(),
            value: String::new(),
            hidden: true,
        });
        self
    }

    pub fn get(&self, name: &str) -> Option<&str> {
        self.fields
            .iter()
            .find(|field| field.name == name)
            .map(|field| field.value.as_str())
    }

    pub fn has_field(&self, name: &str) -> bool {
        self.fields.iter().any(|field| field.name == name)
    }

    pub fn set(&mut self, name: &str, value: &str) -> Result<(), UploadError> {
        let field = self
            .fields
            .iter_mut()
            .find(|field| field.name == name)
            .ok_or_else(|| UploadError::MissingFormField(name.to_string()))?;
        field.value = value.to_string();
        Ok(())
    }

    pub fn visible_fields_mut(&mut self) -> impl Iterator<Item = &mut FormField> {
        self.fields.iter_mut().filter(|field| !field.hidden)
    }

    pub fn entries(&self) -> Vec<(String, String)> {
        self.fields
            .iter()
            .map(|field| (field.name.clone(), field.value.clone()))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn standard_form_carries_hidden_filename_fields() {
        let form = UploadForm::standard("Ada", "ada@example.com");
        assert!(form.has_field(ORIGINAL_FILENAME_FIELD));
        assert!(form.has_field(SAVED_FILENAME_FIELD));
        assert_eq!(form.get("name"), Some("Ada"));
        assert_eq!(form.get(SAVED_FILENAME_FIELD), Some(""));
    }

    #[test]
    fn entries_keep_document_order() {
        let mut form = UploadForm::standard("Ada", "ada@example.com");
        form.set(ORIGINAL_FILENAME_FIELD, "notes.txt").unwrap();

        let names: Vec<String> = form.entries().into_iter().map(|(name, _)| name).collect();
        assert_eq!(
            names,
            vec!["name", "email", ORIGINAL_FILENAME_FIELD, SAVED_FILENAME_FIELD]
        );
        assert_eq!(form.entries()[2].1, "notes.txt");
    }

    #[test]
    fn setting_unknown_field_fails() {
        let mut form = UploadForm::new().with_field("name", "Your Name", "");
        assert_eq!(
            form.set(SAVED_FILENAME_FIELD, "abc"),
            Err(UploadError::MissingFormField(SAVED_FILENAME_FIELD.to_string()))
        );
    }

    #[test]
    fn hidden_fields_are_not_editable() {
        let mut form = UploadForm::standard("", "");
        let editable: Vec<String> = form.visible_fields_mut().map(|f| f.name.clone()).collect();
        assert_eq!(editable, vec!["name", "email"]);
    }
}
