use anyhow::Context;
use dotenv::dotenv;
use log::{error, info};
use simplelog::{ColorChoice, Config, LevelFilter, TermLogger, TerminalMode};

use qfnu_zhjw::models::GradeQuery;
use qfnu_zhjw::{
    fetch_class_schedules, fetch_course_plan, fetch_exam_schedules, fetch_grades,
    fetch_selection_results,
};

// Demo caller for the scraping core: one resource per invocation, result
// printed as JSON. Usage:
//
//   qfnu-zhjw <grades|exams|schedule|selection|plan> [term-or-date]
//
// The forwarded session cookie comes from the ZHJW_COOKIE environment
// variable (a `.env` file is honored).
#[tokio::main]
async fn main() {
    // Loads environment variables from a `.env` file, if present.
    dotenv().ok();

    // Initializes logging with simplelog to the terminal with mixed output (both stdout and stderr) and automatic color support.
    TermLogger::init(
        LevelFilter::Info,
        Config::default(),
        TerminalMode::Mixed,
        ColorChoice::Auto,
    )
    .unwrap();

    let mut args = std::env::args().skip(1);
    let resource = args.next().unwrap_or_else(|| "grades".to_string());
    let param = args.next().unwrap_or_default();

    match run(&resource, &param).await {
        Ok(json) => {
            info!("{} fetched successfully", resource);
            println!("{}", json);
        }
        Err(e) => error!("{} request failed: {:#}", resource, e),
    }
}

async fn run(resource: &str, param: &str) -> anyhow::Result<String> {
    let cookie =
        std::env::var("ZHJW_COOKIE").context("ZHJW_COOKIE environment variable not found")?;

    let json = match resource {
        "grades" => {
            let query = GradeQuery {
                term: param.to_string(),
                ..Default::default()
            };
            serde_json::to_string_pretty(&fetch_grades(&cookie, &query).await?)?
        }
        "exams" => serde_json::to_string_pretty(&fetch_exam_schedules(&cookie, param).await?)?,
        "schedule" => serde_json::to_string_pretty(&fetch_class_schedules(&cookie, param).await?)?,
        "selection" => {
            serde_json::to_string_pretty(&fetch_selection_results(&cookie, param).await?)?
        }
        "plan" => serde_json::to_string_pretty(&fetch_course_plan(&cookie).await?)?,
        other => anyhow::bail!("unknown resource: {}", other),
    };

    Ok(json)
}
