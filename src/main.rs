use anyhow::{Context, Result};
use clap::Parser;
use colored::*;
use std::path::Path;
use std::process::ExitCode;
use std::sync::Arc;

use docqa_cli::{
    display_banner, init_logging, is_exit_command, is_help_command, print_answer, print_error,
    print_help, prompt_question, Args,
};
use docqa_core::LLMProvider;
use docqa_ollama::OllamaClient;
use docqa_rag::{
    validate_pdf_path, InMemoryVectorStore, PdfLoader, PromptStyle, QaPipeline, VectorStore,
};

#[tokio::main]
async fn main() -> ExitCode {
    init_logging("warn");
    let args = Args::parse();

    let Some(pdf_path) = args.pdf_path.clone() else {
        print_error("Please provide a PDF file path as argument");
        return ExitCode::FAILURE;
    };

    match run(&args, &pdf_path).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            print_error(&format!("{:?}", e));
            ExitCode::FAILURE
        }
    }
}

async fn run(args: &Args, pdf_path: &Path) -> Result<()> {
    validate_pdf_path(pdf_path)?;

    let mut llm = OllamaClient::new(args.ollama_config()?)?;
    llm.connect().await.context("Failed to connect to Ollama")?;
    let embedder = Arc::new(llm.clone());

    let mut vector_store = InMemoryVectorStore::new();
    vector_store.connect().await?;

    println!("{} Reading {}...", "📄".blue(), pdf_path.display());
    let pipeline = QaPipeline::build(
        pdf_path,
        &PdfLoader::new(),
        llm,
        embedder,
        Arc::new(vector_store),
        args.pipeline_options(PromptStyle::Grounded),
    )
    .await
    .context("Failed to index the document")?;

    display_banner(pipeline.document());

    while let Some(input) = prompt_question()? {
        if is_exit_command(&input) {
            break;
        }

        if is_help_command(&input) {
            print_help();
            continue;
        }

        if input.trim().is_empty() {
            continue;
        }

        match pipeline.ask(&input).await {
            Ok(answer) => print_answer(&answer.text),
            Err(e) => print_error(&e.to_string()),
        }
    }

    println!("{}", "👋 Goodbye!".green());
    pipeline.shutdown().await?;
    Ok(())
}
