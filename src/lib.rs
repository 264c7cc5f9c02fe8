//! xlsxconv - Spreadsheet to XML / CSV / JSON converter
//!
//! This crate reads a spreadsheet workbook (XLSX, XLSM, XLS, XLSB, ODS) and
//! re-serializes its tabular content as XML, CSV or JSON. No formulas are
//! evaluated and no styling is interpreted: each cell's cached value is
//! rendered as text.
//!
//! # Quick Start
//!
//! ```rust,no_run
//! use xlsxconv::ConverterBuilder;
//!
//! fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     // Create a converter with default settings
//!     let converter = ConverterBuilder::new().build()?;
//!
//!     // Decode the workbook; renderings are computed on first access
//!     let result = converter.convert("example.xlsx")?;
//!
//!     if let Some(conversion) = result.conversion() {
//!         println!("{}", conversion.to_xml()?);
//!         println!("{}", conversion.to_csv()?);
//!         println!("{}", conversion.to_json()?);
//!     }
//!
//!     Ok(())
//! }
//! ```
//!
//! # Custom Configuration
//!
//! ```rust,no_run
//! use xlsxconv::{ConverterBuilder, DateFormat};
//!
//! fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let converter = ConverterBuilder::new()
//!         .with_worksheet_filter("Sales")         // sheets whose name contains "Sales"
//!         .with_csv_separator(",")
//!         .use_numeric_column_headers(true)       // 1, 2, 3 instead of A, B, C
//!         .with_date_format(DateFormat::Yyyymmdd) // 2021/12/25 0:00:00
//!         .short_date_pattern(true)               // 2021/12/25
//!         .build()?;
//!
//!     let result = converter.convert("example.xlsx")?;
//!     if let Some(conversion) = result.conversion() {
//!         println!("{}", conversion.to_csv()?);
//!     }
//!
//!     Ok(())
//! }
//! ```
//!
//! # Soft Failures
//!
//! With `throw_on_failure(false)`, decoding errors are reported through the
//! result instead of an `Err`. Cancellation is always an `Err`.
//!
//! ```rust,no_run
//! use xlsxconv::ConverterBuilder;
//!
//! fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let converter = ConverterBuilder::new().throw_on_failure(false).build()?;
//!     let result = converter.convert("missing.xlsx")?;
//!
//!     assert!(!result.is_success());
//!     println!("{}", result.message().unwrap_or_default());
//!
//!     Ok(())
//! }
//! ```
//!
//! # Convert to String
//!
//! ```rust,no_run
//! use xlsxconv::{ConverterBuilder, OutputFormat};
//!
//! fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let converter = ConverterBuilder::new().build()?;
//!     let json = converter.convert_to_string("example.xlsx", OutputFormat::Json)?;
//!     println!("{}", json);
//!
//!     Ok(())
//! }
//! ```

mod api;
mod builder;
mod cancel;
mod error;
mod formatter;
mod output;
mod parser;
mod result;
mod types;

// 公開API
pub use api::{DateFormat, Locale, OutputFormat};
pub use builder::{ConversionOptions, Converter, ConverterBuilder};
pub use cancel::{CancellationSignal, CancellationToken};
pub use error::XlsxConvError;
pub use formatter::column_letters;
pub use result::{Conversion, ConversionResult};
pub use types::{CellValue, Sheet, Workbook};
