use std::path::PathBuf;

use dotenv::dotenv;

use marketing_posts::agent::AgentModelConfig;
use marketing_posts::config::RunInputs;
use marketing_posts::crew::MarketingPostsCrew;
use marketing_posts::llm::{get_provider, LlmConfig};
use marketing_posts::tools::{get_tools, ToolProvider};

const DEFAULT_INPUTS: &str = "config/input.yaml";
const DEFAULT_TRAIN_FILE: &str = "trained_agents_data.jsonl";

fn usage() -> ! {
    eprintln!("usage: marketing-posts [run | train <n_iterations> [filename]] [--inputs <file>]");
    std::process::exit(2);
}

struct CliArgs {
    command: String,
    rest: Vec<String>,
    inputs_path: PathBuf,
}

fn parse_args() -> CliArgs {
    let mut args = std::env::args().skip(1).collect::<Vec<_>>();
    let mut inputs_path = PathBuf::from(DEFAULT_INPUTS);
    if let Some(pos) = args.iter().position(|a| a == "--inputs") {
        if pos + 1 >= args.len() {
            usage();
        }
        inputs_path = PathBuf::from(args.remove(pos + 1));
        args.remove(pos);
    }
    let mut iter = args.into_iter();
    let command = iter.next().unwrap_or_else(|| "run".to_string());
    CliArgs {
        command,
        rest: iter.collect(),
        inputs_path,
    }
}

async fn build_crew() -> anyhow::Result<marketing_posts::crew::Crew> {
    let provider = get_provider(LlmConfig::from_env());
    let tool_provider = ToolProvider::from_env();
    let tools = get_tools(&tool_provider).await?;
    let model = AgentModelConfig::from_env();
    Ok(MarketingPostsCrew::new(provider, tools, model)
        .with_verbose(true)
        .crew())
}

async fn run(inputs: &RunInputs) -> anyhow::Result<()> {
    let crew = build_crew().await?;
    let output = crew.kickoff(inputs).await?;

    for task_output in &output.task_outputs {
        println!("=== {} ===", task_output.agent_role);
        println!("{}\n", task_output.output);
    }
    println!("Total tokens used: {}", output.total_tokens);
    Ok(())
}

async fn train(args: &[String], inputs: &RunInputs) -> anyhow::Result<()> {
    let Some(n_iterations) = args.first().and_then(|a| a.parse::<usize>().ok()) else {
        usage();
    };
    let filename = args
        .get(1)
        .cloned()
        .unwrap_or_else(|| DEFAULT_TRAIN_FILE.to_string());

    let crew = build_crew().await?;
    crew.train(n_iterations, &filename, inputs).await?;
    println!("Wrote {} training runs to {}", n_iterations, filename);
    Ok(())
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenv().ok();

    let args = parse_args();
    let inputs = RunInputs::from_yaml_file(&args.inputs_path)?;

    match args.command.as_str() {
        "run" => run(&inputs).await,
        "train" => train(&args.rest, &inputs).await,
        _ => usage(),
    }
}
