//! Serialization of matrices to `.xlsx` workbooks.

use std::fs;
use std::path::Path;

use rust_xlsxwriter::Format;
use rust_xlsxwriter::Workbook;
use rust_xlsxwriter::Worksheet;
use tracing::debug;
use tracing::info;

use crate::errors::Result;
use crate::matrix::Matrix;
use crate::matrix::TYPE_ROW_LABEL;

/// A named sheet of a workbook.
pub struct Sheet<'a> {
    /// Name shown on the worksheet tab.
    pub name: &'a str,

    /// The table written to the sheet.
    pub matrix: &'a Matrix,
}

impl<'a> Sheet<'a> {
    /// Creates a new [`Sheet`].
    pub fn new(name: &'a str, matrix: &'a Matrix) -> Self {
        Sheet { name, matrix }
    }
}

/// Writes every sheet into one workbook at `path`.
///
/// Parent directories are created as needed and an existing file at `path` is
/// replaced. Each sheet has the column labels on the first row and the row
/// labels in the first column; the type row, when present, comes first.
/// Values that are not finite (such as the correlation of a constant column)
/// are left blank.
pub fn write_workbook(path: &Path, sheets: &[Sheet<'_>]) -> Result<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)?;
        }
    }

    if path.exists() {
        debug!("  [*] Removing existing {}.", path.display());
        fs::remove_file(path)?;
    }

    let mut workbook = Workbook::new();
    let header = Format::new().set_bold();

    for sheet in sheets {
        let worksheet = workbook.add_worksheet();
        worksheet.set_name(sheet.name)?;
        write_matrix(worksheet, sheet.matrix, &header)?;
    }

    workbook.save(path)?;
    info!(
        "  [*] Wrote {} sheet(s) to {}.",
        sheets.len(),
        path.display()
    );

    Ok(())
}

fn write_matrix(worksheet: &mut Worksheet, matrix: &Matrix, header: &Format) -> Result<()> {
    for (j, label) in matrix.column_labels().iter().enumerate() {
        worksheet.write_string_with_format(0, column(j + 1), label, header)?;
    }

    let mut row = 1u32;
    if let Some(types) = matrix.type_row() {
        worksheet.write_string_with_format(row, 0, TYPE_ROW_LABEL, header)?;
        for (j, t) in types.iter().enumerate() {
            worksheet.write_string(row, column(j + 1), t)?;
        }
        row += 1;
    }

    for (i, label) in matrix.row_labels().iter().enumerate() {
        worksheet.write_string_with_format(row, 0, label, header)?;
        for (j, value) in matrix.row(i).iter().enumerate() {
            if value.is_finite() {
                worksheet.write_number(row, column(j + 1), *value)?;
            }
        }
        row += 1;
    }

    worksheet.set_freeze_panes(1, 1)?;
    Ok(())
}

/// Worksheet column for a matrix position. Positions past the last column
/// Excel supports are clamped so that the writer reports the overflow.
fn column(j: usize) -> u16 {
    u16::try_from(j).unwrap_or(u16::MAX)
}
