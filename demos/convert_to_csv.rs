use std::{fs::File, io::BufWriter};

use clap::Parser;
use xlsx_rows::{XlsxReader, error::XlsxError};

/// Writes one sheet of a workbook as comma-joined lines.
#[derive(Parser)]
struct Args {
    /// Workbook to read.
    input: String,
    /// Sheet to convert; the first sheet when omitted.
    #[arg(short, long)]
    sheet: Option<String>,
    /// Number of columns per row.
    #[arg(short, long, default_value_t = 10)]
    columns: usize,
    /// Output file.
    #[arg(short, long, default_value = "out.csv")]
    output: String,
}

fn main() -> Result<(), XlsxError> {
    let args = Args::parse();
    let mut reader = XlsxReader::open(&args.input, args.columns)?;

    let sheet = match args.sheet {
        Some(sheet) => sheet,
        None => match reader.sheet_names().first() {
            Some(first) => (*first).to_owned(),
            None => return Err(XlsxError::SheetNotFound("<first sheet>".to_owned())),
        },
    };

    let mut file = BufWriter::new(File::create(&args.output)?);
    let n = reader.sheet_to_csv(&sheet, &mut file)?;
    println!("  {sheet} → {} ({n} rows)", args.output);

    Ok(())
}
