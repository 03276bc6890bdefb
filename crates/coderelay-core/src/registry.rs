//! Static bot registry.
//!
//! An immutable, ordered table of bot configurations built once at process
//! start and shared through `Arc`. Lookups are by short bot id.

use coderelay_types::bot::{BotCategory, BotConfig};
use coderelay_types::gateway::GenerationParams;

/// Immutable lookup table of available bots.
#[derive(Debug, Clone)]
pub struct BotRegistry {
    bots: Vec<BotConfig>,
}

impl BotRegistry {
    /// Build a registry from an explicit list. Later duplicates of an id are ignored.
    pub fn new(bots: Vec<BotConfig>) -> Self {
        let mut unique: Vec<BotConfig> = Vec::with_capacity(bots.len());
        for bot in bots {
            if !unique.iter().any(|b| b.id == bot.id) {
                unique.push(bot);
            }
        }
        Self { bots: unique }
    }

    /// The built-in code model lineup.
    pub fn builtin() -> Self {
        let bot = |id: &str,
                   name: &str,
                   model: &str,
                   category: BotCategory,
                   power: u8,
                   description: &str,
                   specs: &str,
                   params: GenerationParams| BotConfig {
            id: id.to_string(),
            name: name.to_string(),
            model: model.to_string(),
            category,
            power,
            description: description.to_string(),
            specs: specs.to_string(),
            params,
        };

        Self::new(vec![
            bot(
                "deepseek-coder-1.3b",
                "DeepSeek Coder 1.3B",
                "deepseek-ai/deepseek-coder-1.3b-instruct",
                BotCategory::Lightning,
                1,
                "Ultra-fast lightweight model for quick code suggestions",
                "1.3B params • Instruct-tuned • Multi-language",
                params(512, 0.3),
            ),
            bot(
                "codegen2-1b",
                "CodeGen2 1B Multi",
                "Salesforce/codegen2-1B-multi",
                BotCategory::Lightning,
                1,
                "Efficient multi-language code generator",
                "1B params • Multi-language • Fast inference",
                params(512, 0.2),
            ),
            bot(
                "llama2-7b-codes",
                "Llama2 Tiny Codes",
                "monsterapi/llama2-7b-tiny-codes-code-generation",
                BotCategory::Lightning,
                2,
                "Llama2 variant tuned for code generation tasks",
                "7B params • Code-focused • Fast generation",
                params(1024, 0.4),
            ),
            bot(
                "starcoder2-3b",
                "StarCoder2 3B",
                "bigcode/starcoder2-3b",
                BotCategory::Balanced,
                2,
                "Balanced model with strong code understanding",
                "3B params • 80+ languages",
                params(1024, 0.3),
            ),
            bot(
                "replit-code-v1",
                "Replit Code v1 3B",
                "replit/replit-code-v1-3b",
                BotCategory::Balanced,
                2,
                "Code-specialized model with an IDE focus",
                "3B params • IDE-optimized • Multi-language",
                params(512, 0.3),
            ),
            bot(
                "codegeex4-9b",
                "CodeGeeX4 All 9B",
                "THUDM/codegeex4-all-9b",
                BotCategory::Balanced,
                2,
                "General code model with strong reasoning",
                "9B params • All-purpose • Advanced reasoning",
                params(1024, 0.3),
            ),
            bot(
                "kurage-multilingual",
                "Kurage Multilingual",
                "lightblue/kurage-multilingual",
                BotCategory::Balanced,
                2,
                "Multilingual assistant",
                "Multilingual • Balanced speed",
                params(1024, 0.3),
            ),
            bot(
                "codellama-13b",
                "Code Llama 13B Instruct",
                "codellama/CodeLlama-13b-Instruct-hf",
                BotCategory::Power,
                3,
                "Instruction-tuned coding model",
                "13B params • Instruct-tuned • High accuracy",
                params(2048, 0.3),
            ),
            bot(
                "starcoder2-15b",
                "StarCoder2 15B",
                "bigcode/starcoder2-15b",
                BotCategory::Power,
                3,
                "Largest StarCoder2 variant",
                "15B params • 80+ languages",
                params(1024, 0.3),
            ),
            bot(
                "deepseek-coder-33b",
                "DeepSeek Coder 33B",
                "deepseek-ai/deepseek-coder-33b-instruct",
                BotCategory::Power,
                3,
                "Largest model in the lineup, best reasoning and code quality",
                "33B params • Maximum power",
                params(2048, 0.3),
            ),
        ])
    }

    /// Look up a bot by id.
    pub fn get(&self, bot_id: &str) -> Option<&BotConfig> {
        self.bots.iter().find(|b| b.id == bot_id)
    }

    /// All bots in registration order.
    pub fn all(&self) -> &[BotConfig] {
        &self.bots
    }

    pub fn len(&self) -> usize {
        self.bots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bots.is_empty()
    }
}

fn params(max_tokens: u32, temperature: f64) -> GenerationParams {
    GenerationParams {
        max_tokens,
        temperature,
    }
}
