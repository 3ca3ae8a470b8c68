use std::path::Path;

use miette::{IntoDiagnostic, Result};
use weather_report::Forecast;

const DEFAULT_INPUTS: &[&str] = &[
    "data/forecast_5days_a.json",
    "data/forecast_5days_b.json",
    "data/forecast_10days.json",
];

fn main() -> Result<()> {
    let args: Vec<String> = std::env::args().skip(1).collect();
    let inputs: Vec<&str> = if args.is_empty() {
        DEFAULT_INPUTS.to_vec()
    } else {
        args.iter().map(String::as_str).collect()
    };

    for input in inputs {
        println!("opening {input}");
        let report = Forecast::from_path(input)?.summary()?.to_string();
        println!("{report}");

        let stem = Path::new(input)
            .file_stem()
            .and_then(|stem| stem.to_str())
            .unwrap_or("forecast");
        let output = format!("{stem}_output.txt");
        std::fs::write(&output, &report).into_diagnostic()?;
        println!("wrote {output}");
    }

    Ok(())
}
