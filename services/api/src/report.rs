use clap::Args;
use grade_calc::config::AppConfig;
use grade_calc::error::AppError;
use grade_calc::grading::{
    calculate_custom, CalculationRequest, CalculationResult, CustomCalculationRequest,
    GradeCalculator, RawMark,
};
use grade_calc::reference::FileReferenceData;
use std::path::PathBuf;
use std::sync::Arc;

#[derive(Args, Debug)]
pub(crate) struct CalculateArgs {
    /// Syllabus code, e.g. 0610
    #[arg(long)]
    pub(crate) subject: String,
    /// Exam series, e.g. "November 2024"
    #[arg(long)]
    pub(crate) series: String,
    /// Component codes taken (repeat the flag or separate with commas)
    #[arg(long = "component", value_delimiter = ',', required = true)]
    pub(crate) components: Vec<String>,
    /// Raw marks in the same order as the components
    #[arg(
        long = "mark",
        value_delimiter = ',',
        required = true,
        allow_hyphen_values = true
    )]
    pub(crate) marks: Vec<String>,
    /// Reference data directory (overrides APP_REFERENCE_DIR)
    #[arg(long)]
    pub(crate) data_dir: Option<PathBuf>,
    /// Print the result as JSON instead of a summary
    #[arg(long)]
    pub(crate) json: bool,
}

#[derive(Args, Debug)]
pub(crate) struct CustomArgs {
    /// JSON file holding raw_marks, custom_scwf and custom_thresholds
    #[arg(long)]
    pub(crate) input: PathBuf,
    /// Print the result as JSON instead of a summary
    #[arg(long)]
    pub(crate) json: bool,
}

pub(crate) fn run_calculation(args: CalculateArgs) -> Result<(), AppError> {
    let CalculateArgs {
        subject,
        series,
        components,
        marks,
        data_dir,
        json,
    } = args;

    let mut config = AppConfig::load()?;
    if let Some(data_dir) = data_dir {
        config.reference.data_dir = data_dir;
    }

    let provider = Arc::new(FileReferenceData::from_config(&config.reference)?);
    let calculator = GradeCalculator::new(provider);
    let request = CalculationRequest {
        subject_code: subject,
        exam_series: series,
        components,
        raw_marks: marks.iter().map(|mark| RawMark::from(mark.as_str())).collect(),
    };

    let result = calculator.calculate(&request)?;
    if json {
        print_json(&result)
    } else {
        render_result(
            &format!("{} {}", request.subject_code, request.exam_series),
            &result,
        );
        Ok(())
    }
}

pub(crate) fn run_custom_calculation(args: CustomArgs) -> Result<(), AppError> {
    let contents = std::fs::read_to_string(&args.input)?;
    let request: CustomCalculationRequest =
        serde_json::from_str(&contents).map_err(std::io::Error::from)?;

    let result = calculate_custom(&request)?;
    if args.json {
        print_json(&result)
    } else {
        render_result(&format!("Custom ({})", args.input.display()), &result);
        Ok(())
    }
}

fn print_json(result: &CalculationResult) -> Result<(), AppError> {
    let rendered = serde_json::to_string_pretty(result).map_err(std::io::Error::from)?;
    println!("{rendered}");
    Ok(())
}

pub(crate) fn render_result(heading: &str, result: &CalculationResult) {
    println!("Grade calculation: {heading}");

    println!("\nComponents");
    for detail in &result.details {
        println!(
            "- {}: {}/{} x {} = {}/{}",
            detail.component_code,
            detail.raw_mark,
            detail.max_raw_mark,
            detail.weighting_factor,
            detail.weighted_mark,
            detail.max_weighted_mark
        );
    }

    println!(
        "\nSyllabus total: {} / {}",
        result.syllabus_total, result.max_weighted_total
    );

    if let Some(option) = &result.option {
        match result.tier {
            Some(tier) => println!("Option: {} ({} tier)", option, tier.label()),
            None => println!("Option: {}", option),
        }
    }

    match result.grade {
        Some(grade) => println!("Grade: {}", grade.label()),
        None => println!("Grade: not available"),
    }

    match result.pum {
        Some(pum) => println!("Percentage uniform mark: {}", pum),
        None => println!("Percentage uniform mark: not available"),
    }

    if let Some(thresholds) = &result.thresholds {
        let boundaries: Vec<String> = thresholds
            .iter()
            .map(|(grade, boundary)| format!("{} {}", grade.label(), boundary))
            .collect();
        println!("Thresholds: {}", boundaries.join(", "));
    }

    if let Some(message) = &result.message {
        println!("\nNote: {}", message);
    }
}
