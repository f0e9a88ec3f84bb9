use clap::Parser;
use xlsx_rows::{XlsxReader, error::XlsxError};

/// Lists the sheets that hold data, with their header titles.
#[derive(Parser)]
struct Args {
    input: String,
    /// Number of columns per row.
    #[arg(short, long, default_value_t = 10)]
    columns: usize,
}

fn main() -> Result<(), XlsxError> {
    let args = Args::parse();
    let mut reader = XlsxReader::open(&args.input, args.columns)?;

    for sheet in reader.sheets_with_rows(args.columns) {
        let header = reader.sheet_header(&sheet, args.columns)?;
        let body = reader.sheet_body(&sheet)?;
        println!("{sheet}: {} ({} rows sampled)", header.join(" | "), body.len());
    }

    Ok(())
}
