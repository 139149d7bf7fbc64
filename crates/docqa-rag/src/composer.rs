//! Prompt templates and the answer composer

use serde::{Deserialize, Serialize};

use docqa_core::{Error, GenerationConfig, LLMProvider, RAGResult, Result};

/// Which instructions wrap the context and question
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PromptStyle {
    /// Answer strictly from the document context
    #[default]
    Grounded,
    /// Biology tutor that may also draw on general knowledge and write flashcards
    Tutor,
}

/// Named fields substituted into a prompt template
#[derive(Debug, Clone, Copy)]
pub struct PromptFields<'a> {
    pub context: &'a str,
    pub question: &'a str,
}

/// Render the prompt for a style
pub fn render_prompt(style: PromptStyle, fields: PromptFields<'_>) -> String {
    match style {
        PromptStyle::Grounded => format!(
            "Answer the question based only on the context provided.\n\
            \n\
            Context: {context}\n\
            \n\
            Question: {question}\n",
            context = fields.context,
            question = fields.question,
        ),
        PromptStyle::Tutor => format!(
            "You are an expert biology tutor specializing in macromolecules. Answer based on the context provided and your knowledge of biochemistry.\n\
            \n\
            Context from document: {context}\n\
            \n\
            User request: {question}\n\
            \n\
            Instructions:\n\
            - If creating flashcards, focus on macromolecule concepts like:\n  \
              * Types of macromolecules (carbohydrates, lipids, proteins, nucleic acids)\n  \
              * Monomers vs polymers\n  \
              * Structure and function relationships\n  \
              * Biochemical processes (dehydration synthesis, hydrolysis)\n  \
              * Specific examples and biological roles\n\
            - Format flashcards as a clean JSON array: [{{\"question\": \"...\", \"answer\": \"...\"}}]\n\
            - Create comprehensive, educational flashcards suitable for studying\n\
            - If the document content is limited, use general macromolecule knowledge to create relevant study materials\n",
            context = fields.context,
            question = fields.question,
        ),
    }
}

/// Trim a question and reject it if nothing is left
pub fn prepare_question(question: &str) -> Result<&str> {
    let question = question.trim();
    if question.is_empty() {
        return Err(Error::InvalidInput("No question provided".to_string()));
    }
    Ok(question)
}

/// Formats retrieved context and a question into a prompt and asks the model
pub struct AnswerComposer<L: LLMProvider> {
    llm: L,
    style: PromptStyle,
    generation: GenerationConfig,
}

impl<L: LLMProvider> AnswerComposer<L> {
    /// Create a composer for the given model handle
    pub fn new(llm: L, style: PromptStyle) -> Self {
        let generation = GenerationConfig {
            model_id: llm.model_id().to_string(),
            ..Default::default()
        };
        Self {
            llm,
            style,
            generation,
        }
    }

    /// Override generation settings
    pub fn with_generation_config(mut self, generation: GenerationConfig) -> Self {
        self.generation = generation;
        self
    }

    pub fn style(&self) -> PromptStyle {
        self.style
    }

    /// Build the prompt for a question and its retrieved context
    pub fn compose_prompt(&self, question: &str, retrieved: &RAGResult) -> String {
        render_prompt(
            self.style,
            PromptFields {
                context: &retrieved.context,
                question,
            },
        )
    }

    /// Ask the model; its text comes back exactly as generated
    pub async fn answer(&self, prompt: &str) -> Result<String> {
        let result = self.llm.generate_with_config(prompt, &self.generation).await?;
        Ok(result.text)
    }

    pub fn llm(&self) -> &L {
        &self.llm
    }

    pub fn llm_mut(&mut self) -> &mut L {
        &mut self.llm
    }
}
