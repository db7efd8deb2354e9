mod csv_export;

pub(crate) use csv_export::{default_export_path, export_csv};
