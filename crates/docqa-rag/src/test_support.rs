//! Shared fixtures for unit tests

use async_trait::async_trait;
use lopdf::content::{Content, Operation};
use lopdf::{dictionary, Object, Stream};
use std::path::Path;
use std::sync::{Arc, Mutex};
use tempfile::NamedTempFile;

use docqa_core::{
    DocumentLoader, Embedder, Error, GenerationConfig, GenerationResult, LLMProvider, Result,
    Segment,
};

const BUCKETS: usize = 256;

/// Bag-of-words embedder: each lowercase word increments one md5-chosen bucket
pub struct HashingEmbedder;

#[async_trait]
impl Embedder for HashingEmbedder {
    async fn embed(&self, text: &str) -> Result<Vec<f32>> {
        let mut vector = vec![0.0; BUCKETS];
        for word in text
            .split(|c: char| !c.is_alphanumeric())
            .filter(|w| !w.is_empty())
        {
            let digest = md5::compute(word.to_lowercase());
            vector[digest.0[0] as usize] += 1.0;
        }
        Ok(vector)
    }

    fn embedding_model(&self) -> &str {
        "hashing-test"
    }
}

/// LLM that records every prompt and answers with a fixed reply
#[derive(Clone)]
pub struct RecordingLlm {
    pub prompts: Arc<Mutex<Vec<String>>>,
    pub reply: String,
    pub connected: bool,
}

impl RecordingLlm {
    pub fn new(reply: &str) -> Self {
        Self {
            prompts: Arc::new(Mutex::new(Vec::new())),
            reply: reply.to_string(),
            connected: true,
        }
    }

    pub fn calls(&self) -> usize {
        self.prompts.lock().unwrap().len()
    }

    pub fn last_prompt(&self) -> Option<String> {
        self.prompts.lock().unwrap().last().cloned()
    }
}

#[async_trait]
impl LLMProvider for RecordingLlm {
    async fn connect(&mut self) -> Result<()> {
        self.connected = true;
        Ok(())
    }

    async fn generate(&self, prompt: &str) -> Result<GenerationResult> {
        self.generate_with_config(prompt, &GenerationConfig::default()).await
    }

    async fn generate_with_config(
        &self,
        prompt: &str,
        config: &GenerationConfig,
    ) -> Result<GenerationResult> {
        self.prompts.lock().unwrap().push(prompt.to_string());
        Ok(GenerationResult {
            text: self.reply.clone(),
            model_id: config.model_id.clone(),
            tokens_used: None,
        })
    }

    async fn shutdown(&mut self) -> Result<()> {
        self.connected = false;
        Ok(())
    }

    fn model_id(&self) -> &str {
        "recording-test"
    }
}

/// Loader returning canned results; an `Err` message makes that call fail
pub struct StaticLoader {
    pub split: std::result::Result<Vec<String>, String>,
    pub raw: std::result::Result<Vec<String>, String>,
}

impl StaticLoader {
    pub fn new(split: &[&str], raw: &[&str]) -> Self {
        Self {
            split: Ok(split.iter().map(|s| s.to_string()).collect()),
            raw: Ok(raw.iter().map(|s| s.to_string()).collect()),
        }
    }

    pub fn failing_split(message: &str, raw: &[&str]) -> Self {
        Self {
            split: Err(message.to_string()),
            raw: Ok(raw.iter().map(|s| s.to_string()).collect()),
        }
    }

    pub fn failing_raw(message: &str) -> Self {
        Self {
            split: Ok(Vec::new()),
            raw: Err(message.to_string()),
        }
    }
}

impl DocumentLoader for StaticLoader {
    fn load_and_split(&self, _path: &Path) -> Result<Vec<Segment>> {
        match &self.split {
            Ok(pages) => Ok(pages
                .iter()
                .enumerate()
                .filter_map(|(i, text)| Segment::new(text.as_str()).ok().map(|s| s.on_page(i as u32 + 1)))
                .collect()),
            Err(message) => Err(Error::DocumentLoader(message.clone())),
        }
    }

    fn load_raw(&self, _path: &Path) -> Result<Vec<String>> {
        self.raw
            .clone()
            .map_err(Error::DocumentLoader)
    }
}

fn write_pdf(page_operations: Vec<Vec<Operation>>) -> NamedTempFile {
    let mut doc = lopdf::Document::with_version("1.5");
    let pages_id = doc.new_object_id();
    let font_id = doc.add_object(dictionary! {
        "Type" => "Font",
        "Subtype" => "Type1",
        "BaseFont" => "Courier",
    });
    let resources_id = doc.add_object(dictionary! {
        "Font" => dictionary! {
            "F1" => font_id,
        },
    });

    let mut kids: Vec<Object> = Vec::new();
    for operations in page_operations {
        let content = Content { operations };
        let content_id = doc.add_object(Stream::new(dictionary! {}, content.encode().unwrap()));
        let page_id = doc.add_object(dictionary! {
            "Type" => "Page",
            "Parent" => pages_id,
            "Contents" => content_id,
            "Resources" => resources_id,
            "MediaBox" => vec![0.into(), 0.into(), 595.into(), 842.into()],
        });
        kids.push(page_id.into());
    }

    let count = kids.len() as i64;
    let pages = dictionary! {
        "Type" => "Pages",
        "Kids" => kids,
        "Count" => count,
    };
    doc.objects.insert(pages_id, Object::Dictionary(pages));
    let catalog_id = doc.add_object(dictionary! {
        "Type" => "Catalog",
        "Pages" => pages_id,
    });
    doc.trailer.set("Root", catalog_id);

    let file = tempfile::Builder::new().suffix(".pdf").tempfile().unwrap();
    doc.save(file.path()).unwrap();
    file
}

/// Write a PDF with one line of text per page
pub fn write_text_pdf(pages: &[&str]) -> NamedTempFile {
    write_pdf(
        pages
            .iter()
            .map(|text| {
                vec![
                    Operation::new("BT", vec![]),
                    Operation::new("Tf", vec!["F1".into(), 12.into()]),
                    Operation::new("Td", vec![72.into(), 720.into()]),
                    Operation::new("Tj", vec![Object::string_literal(*text)]),
                    Operation::new("ET", vec![]),
                ]
            })
            .collect(),
    )
}

/// Write a PDF whose pages only contain drawing operations, like a scanned deck
pub fn write_blank_pdf(page_count: usize) -> NamedTempFile {
    write_pdf(
        (0..page_count)
            .map(|_| {
                vec![
                    Operation::new("re", vec![72.into(), 72.into(), 400.into(), 600.into()]),
                    Operation::new("f", vec![]),
                ]
            })
            .collect(),
    )
}
