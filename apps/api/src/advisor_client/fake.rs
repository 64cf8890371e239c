//! In-process `AdviceGenerator` for handler and pipeline tests.

use std::sync::Mutex;

use async_trait::async_trait;

use crate::advice::prompts::AdvicePrompt;
use crate::advisor_client::{AdviceGenerator, AdviceResult, AdvisorError};

enum Reply {
    Text(String),
    Unavailable,
    Unauthorized,
    Empty,
}

pub struct FakeAdvisor {
    reply: Reply,
    prompts: Mutex<Vec<String>>,
}

impl FakeAdvisor {
    fn with(reply: Reply) -> Self {
        Self {
            reply,
            prompts: Mutex::new(Vec::new()),
        }
    }

    pub fn replying(text: &str) -> Self {
        Self::with(Reply::Text(text.to_string()))
    }

    pub fn unavailable() -> Self {
        Self::with(Reply::Unavailable)
    }

    pub fn unauthorized() -> Self {
        Self::with(Reply::Unauthorized)
    }

    pub fn empty() -> Self {
        Self::with(Reply::Empty)
    }

    /// Every prompt received so far, in call order.
    pub fn prompts(&self) -> Vec<String> {
        self.prompts.lock().unwrap().clone()
    }
}

#[async_trait]
impl AdviceGenerator for FakeAdvisor {
    async fn get_advice(&self, prompt: &AdvicePrompt) -> Result<AdviceResult, AdvisorError> {
        self.prompts.lock().unwrap().push(prompt.as_str().to_string());
        match &self.reply {
            Reply::Text(text) => Ok(AdviceResult(text.clone())),
            Reply::Unavailable => Err(AdvisorError::ServiceUnavailable("status 503".into())),
            Reply::Unauthorized => Err(AdvisorError::Authentication("bad key".into())),
            Reply::Empty => Err(AdvisorError::EmptyContent),
        }
    }

    fn model(&self) -> &str {
        "fake"
    }
}
