use super::headers::FIELDS;
use super::ImportError;

/// Header row of every importable column followed by one example row.
pub fn build_template() -> Vec<Vec<String>> {
    vec![
        FIELDS.iter().map(|spec| spec.label.to_owned()).collect(),
        FIELDS.iter().map(|spec| spec.example.to_owned()).collect(),
    ]
}

pub fn template_csv() -> Result<Vec<u8>, ImportError> {
    let mut writer = csv::Writer::from_writer(Vec::new());
    for row in build_template() {
        writer.write_record(&row)?;
    }

    writer.into_inner().map_err(|error| ImportError::Parse { reason: error.to_string() })
}
