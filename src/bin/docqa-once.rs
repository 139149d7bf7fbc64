//! Answer exactly one question read from stdin.
//!
//! Diagnostics go to stderr and only the answer goes to stdout, so the output
//! can be captured by a calling process. Exits 1 on any error.

use anyhow::{Context, Result};
use clap::Parser;
use std::io;
use std::path::Path;
use std::process::ExitCode;
use std::sync::Arc;

use docqa_cli::{init_logging, print_error, read_line_from, Args};
use docqa_core::LLMProvider;
use docqa_ollama::OllamaClient;
use docqa_rag::{
    prepare_question, validate_pdf_path, InMemoryVectorStore, PdfLoader, PromptStyle, QaPipeline,
    VectorStore,
};

#[tokio::main]
async fn main() -> ExitCode {
    init_logging("info");

    let args = match Args::try_parse() {
        Ok(args) => args,
        Err(e) => {
            let failed = e.use_stderr();
            let _ = e.print();
            return if failed { ExitCode::FAILURE } else { ExitCode::SUCCESS };
        }
    };

    let Some(pdf_path) = args.pdf_path.clone() else {
        print_error("Please provide a PDF file path as argument");
        return ExitCode::FAILURE;
    };

    if let Err(e) = validate_pdf_path(&pdf_path) {
        print_error(&e.to_string());
        return ExitCode::FAILURE;
    }

    match run(&args, &pdf_path).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            print_error(&format!("{:?}", e));
            ExitCode::FAILURE
        }
    }
}

async fn run(args: &Args, pdf_path: &Path) -> Result<()> {
    tracing::info!("creating Ollama model and embeddings");
    let mut llm = OllamaClient::new(args.ollama_config()?)?;
    llm.connect().await.context("Failed to connect to Ollama")?;
    let embedder = Arc::new(llm.clone());

    let mut vector_store = InMemoryVectorStore::new();
    vector_store.connect().await?;

    let pipeline = QaPipeline::build(
        pdf_path,
        &PdfLoader::new(),
        llm,
        embedder,
        Arc::new(vector_store),
        args.pipeline_options(PromptStyle::Tutor),
    )
    .await
    .context("Error processing PDF")?;

    tracing::info!("waiting for question");
    let question = read_line_from(&mut io::stdin().lock())?.unwrap_or_default();
    tracing::info!(question = %question.trim(), "got question");

    let question = prepare_question(&question)?;

    tracing::info!("processing question with AI");
    let answer = pipeline.ask(question).await?;
    println!("{}", answer.text);

    pipeline.shutdown().await?;
    Ok(())
}
