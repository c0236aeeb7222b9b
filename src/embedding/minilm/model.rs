use std::path::Path;

use candle_core::{DType, Device, Tensor};
use candle_nn::VarBuilder;
use candle_transformers::models::bert::{BertModel, Config};

use crate::embedding::error::EmbeddingError;

/// BERT encoder with attention-mask mean pooling, the sentence-transformers
/// recipe for all-MiniLM-L6-v2.
pub struct BertForSentenceEmbedding {
    bert: BertModel,
    hidden_size: usize,
}

impl BertForSentenceEmbedding {
    pub fn load(model_dir: &Path, device: &Device) -> Result<Self, EmbeddingError> {
        let config_content = std::fs::read_to_string(model_dir.join("config.json"))?;
        let config: Config =
            serde_json::from_str(&config_content).map_err(|e| EmbeddingError::ModelLoadFailed {
                reason: format!("failed to parse transformer config: {e}"),
            })?;

        let weights_path = model_dir.join("model.safetensors");
        // SAFETY: the weights file is mapped read-only and not mutated while
        // the process runs.
        let vb = unsafe {
            VarBuilder::from_mmaped_safetensors(&[weights_path], DType::F32, device).map_err(
                |e| EmbeddingError::ModelLoadFailed {
                    reason: format!("failed to map safetensors: {e}"),
                },
            )?
        };

        let hidden_size = config.hidden_size;
        let bert = BertModel::load(vb, &config).map_err(|e| EmbeddingError::ModelLoadFailed {
            reason: format!("failed to load BERT weights: {e}"),
        })?;

        Ok(Self { bert, hidden_size })
    }

    pub fn hidden_size(&self) -> usize {
        self.hidden_size
    }

    /// Runs the encoder over one token sequence and mean-pools the output.
    ///
    /// Returns an un-normalized sentence vector of `hidden_size` length.
    pub fn forward_pooled(
        &self,
        tokens: &[u32],
        device: &Device,
    ) -> Result<Vec<f32>, EmbeddingError> {
        let seq_len = tokens.len();
        let input_ids = Tensor::new(tokens, device)?.unsqueeze(0)?;
        let token_type_ids = input_ids.zeros_like()?;
        let attention_mask = input_ids.ones_like()?;

        // [1, seq_len, hidden]
        let hidden = self
            .bert
            .forward(&input_ids, &token_type_ids, Some(&attention_mask))?;

        // With a single unpadded sequence the mask is all ones, so mean
        // pooling reduces to a plain mean over the sequence axis.
        let pooled = (hidden.sum(1)? / (seq_len as f64))?;
        let embedding = pooled.squeeze(0)?.to_vec1::<f32>()?;
        Ok(embedding)
    }
}
