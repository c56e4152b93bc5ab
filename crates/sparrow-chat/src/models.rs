//! Catalog of free OpenRouter models and prompt-size based selection.

use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ModelInfo {
    pub name: &'static str,
    pub id: &'static str,
    pub input_cost: f64,
    pub output_cost: f64,
    pub context_tokens: u32,
}

const fn free(name: &'static str, id: &'static str, context_tokens: u32) -> ModelInfo {
    ModelInfo {
        name,
        id,
        input_cost: 0.0,
        output_cost: 0.0,
        context_tokens,
    }
}

pub const MODELS: &[ModelInfo] = &[
    free("xAI: Grok 4.1 Fast", "x-ai/grok-4.1-fast", 2_000_000),
    free("xAI: Grok 4.1 Fast (free)", "x-ai/grok-4.1-fast:free", 2_000_000),
    free("Kwaipilot: KAT-Coder-Pro V1 (free)", "kwaipilot/kat-coder-pro:free", 256_000),
    free("NVIDIA: Nemotron Nano 12B 2 VL (free)", "nvidia/nemotron-nano-12b-v2-vl:free", 128_000),
    free("Tongyi DeepResearch 30B A3B (free)", "alibaba/tongyi-deepresearch-30b-a3b:free", 131_072),
    free("Meituan: LongCat Flash Chat (free)", "meituan/longcat-flash-chat:free", 131_072),
    free("NVIDIA: Nemotron Nano 9B V2 (free)", "nvidia/nemotron-nano-9b-v2:free", 128_000),
    free("OpenAI: gpt-oss-20b (free)", "openai/gpt-oss-20b:free", 131_072),
    free("Z.AI: GLM 4.5 Air (free)", "z-ai/glm-4.5-air:free", 131_072),
    free("Qwen: Qwen3 Coder 480B A35B (free)", "qwen/qwen3-coder:free", 262_000),
    free("MoonshotAI: Kimi K2 0711 (free)", "moonshotai/kimi-k2:free", 32_768),
    free("Venice: Uncensored (free)", "cognitivecomputations/dolphin-mistral-24b-venice-edition:free", 32_768),
    free("Google: Gemma 3n 2B (free)", "google/gemma-3n-e2b-it:free", 8_192),
    free("TNG: DeepSeek R1T2 Chimera (free)", "tngtech/deepseek-r1t2-chimera:free", 163_840),
    free("Mistral: Mistral Small 3.2 24B (free)", "mistralai/mistral-small-3.2-24b-instruct:free", 131_072),
    free("DeepSeek: DeepSeek R1 0528 Qwen3 8B (free)", "deepseek/deepseek-r1-0528-qwen3-8b:free", 131_072),
    free("DeepSeek: R1 0528 (free)", "deepseek/deepseek-r1-0528:free", 163_840),
    free("Google: Gemma 3n 4B (free)", "google/gemma-3n-e4b-it:free", 8_192),
    free("Qwen: Qwen3 4B (free)", "qwen/qwen3-4b:free", 40_960),
    free("Qwen: Qwen3 30B A3B (free)", "qwen/qwen3-30b-a3b:free", 40_960),
    free("Qwen: Qwen3 14B (free)", "qwen/qwen3-14b:free", 40_960),
    free("Qwen: Qwen3 235B A22B (free)", "qwen/qwen3-235b-a22b:free", 40_960),
    free("TNG: DeepSeek R1T Chimera (free)", "tngtech/deepseek-r1t-chimera:free", 163_840),
    free("Microsoft: MAI DS R1 (free)", "microsoft/mai-ds-r1:free", 163_840),
    free("ArliAI: QwQ 32B RpR v1 (free)", "arliai/qwq-32b-arliai-rpr-v1:free", 32_768),
    free("Qwen: Qwen2.5 VL 32B Instruct (free)", "qwen/qwen2.5-vl-32b-instruct:free", 16_384),
    free("DeepSeek: DeepSeek V3 0324 (free)", "deepseek/deepseek-chat-v3-0324:free", 163_840),
    free("Mistral: Mistral Small 3.1 24B (free)", "mistralai/mistral-small-3.1-24b-instruct:free", 96_000),
    free("Google: Gemma 3 4B (free)", "google/gemma-3-4b-it:free", 32_768),
    free("Google: Gemma 3 12B (free)", "google/gemma-3-12b-it:free", 32_768),
    free("Google: Gemma 3 27B (free)", "google/gemma-3-27b-it:free", 131_072),
    free("Mistral: Mistral Small 3 (free)", "mistralai/mistral-small-24b-instruct-2501:free", 32_768),
    free("DeepSeek: R1 Distill Llama 70B (free)", "deepseek/deepseek-r1-distill-llama-70b:free", 8_192),
    free("DeepSeek: R1 (free)", "deepseek/deepseek-r1:free", 163_840),
    free("Google: Gemini 2.0 Flash Experimental (free)", "google/gemini-2.0-flash-exp:free", 1_048_576),
    free("Meta: Llama 3.3 70B Instruct (free)", "meta-llama/llama-3.3-70b-instruct:free", 131_072),
    free("Qwen2.5 Coder 32B Instruct (free)", "qwen/qwen-2.5-coder-32b-instruct:free", 32_768),
    free("Meta: Llama 3.2 3B Instruct (free)", "meta-llama/llama-3.2-3b-instruct:free", 131_072),
    free("Qwen2.5 72B Instruct (free)", "qwen/qwen-2.5-72b-instruct:free", 32_768),
    free("Nous: Hermes 3 405B Instruct (free)", "nousresearch/hermes-3-llama-3.1-405b:free", 131_072),
    free("Mistral: Mistral Nemo (free)", "mistralai/mistral-nemo:free", 131_072),
    free("Mistral: Mistral 7B Instruct (free)", "mistralai/mistral-7b-instruct:free", 32_768),
];

const LARGE_PROMPT_CHARS: usize = 100_000;
const MEDIUM_PROMPT_CHARS: usize = 30_000;

pub fn find_model(id: &str) -> Option<&'static ModelInfo> {
    MODELS.iter().find(|m| m.id == id)
}

/// Pick a model whose context fits the prompt: very long prompts go to a
/// 2M-token model, long ones to a coder model, the rest to a fast default.
/// Falls back to the first catalog entry if the preferred id is missing.
pub fn select_model(prompt: &str) -> &'static ModelInfo {
    let len = prompt.chars().count();
    let preferred = if len > LARGE_PROMPT_CHARS {
        "x-ai/grok-4.1-fast:free"
    } else if len > MEDIUM_PROMPT_CHARS {
        "qwen/qwen3-coder:free"
    } else {
        "google/gemini-2.0-flash-exp:free"
    };
    find_model(preferred).unwrap_or(&MODELS[0])
}
