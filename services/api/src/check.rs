use clap::Args;
use patient_match::error::AppError;
use patient_match::matching::{
    breakdown, decode_match_request, extract, validate, ExtractedFields, ScoreComponent,
    ValidationOutcome, WireFormat, MAX_SCORE,
};
use serde::Serialize;
use std::path::PathBuf;

#[derive(Args, Debug)]
pub(crate) struct CheckArgs {
    /// Path to a FHIR Parameters document carrying the Patient to match (`.xml` files are read
    /// as FHIR XML, anything else as FHIR JSON)
    #[arg(long)]
    pub(crate) file: PathBuf,
    /// Print the report as JSON instead of plain text
    #[arg(long)]
    pub(crate) json: bool,
}

#[derive(Debug, Serialize)]
pub(crate) struct CheckReport {
    pub(crate) outcome: ValidationOutcome,
    pub(crate) fields: ExtractedFields,
    pub(crate) components: Vec<ScoreComponent>,
}

pub(crate) fn run_check(args: CheckArgs) -> Result<(), AppError> {
    let body = std::fs::read(&args.file)?;
    let format = match args.file.extension().and_then(|ext| ext.to_str()) {
        Some(ext) if ext.eq_ignore_ascii_case("xml") => WireFormat::Xml,
        _ => WireFormat::Json,
    };
    let report = build_report(&body, format)?;

    if args.json {
        let rendered = serde_json::to_string_pretty(&report).map_err(std::io::Error::from)?;
        println!("{rendered}");
    } else {
        render_report(&report);
    }

    Ok(())
}

pub(crate) fn build_report(body: &[u8], format: WireFormat) -> Result<CheckReport, AppError> {
    let record = decode_match_request(body, format)?;
    let fields = extract(&record);

    Ok(CheckReport {
        outcome: validate(&record),
        components: breakdown(&fields),
        fields,
    })
}

fn render_report(report: &CheckReport) {
    let outcome = &report.outcome;
    let tier = outcome
        .tier()
        .map(|tier| tier.to_string())
        .unwrap_or_else(|| "unclassified".to_string());

    println!("Patient/$match minimum criteria check");
    println!("- profile tier: {tier}");
    println!("- weighted score: {}/{}", outcome.score, MAX_SCORE);
    for component in &report.components {
        println!("  - {:?}: +{}", component.signal, component.points);
    }
    println!(
        "- qualifying contact: {}",
        yes_no(report.fields.has_qualifying_contact)
    );

    if outcome.accepted {
        println!("Result: eligible for matching");
    } else {
        println!("Result: rejected");
        println!("Reason: {}", outcome.reason);
    }
}

fn yes_no(value: bool) -> &'static str {
    if value {
        "yes"
    } else {
        "no"
    }
}
