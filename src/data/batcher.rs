// ============================================================
// Layer 4 — Token Batcher
// ============================================================
// Implements Burn's Batcher trait to turn variable-length id
// sequences into one rectangular [batch, seq_len] Int tensor.
//
// Sequences are right-padded with the vocabulary's padding id
// up to the longest sequence in the batch:
//
//   [5, 8, 2]         [5, 8, 2, P]
//   [7]          →    [7, P, P, P]
//   [1, 1, 3, 9]      [1, 1, 3, 9]
//
// The true lengths are kept so callers can find each sequence's
// last real position.
//
// Reference: Burn Book §4 (Batcher)

use burn::{
    data::dataloader::batcher::Batcher,
    prelude::*,
};

// ─── TokenBatch ───────────────────────────────────────────────────────────────
#[derive(Debug, Clone)]
pub struct TokenBatch<B: Backend> {
    /// Padded ids — shape: [batch_size, seq_len]
    pub input_ids: Tensor<B, 2, Int>,

    /// Unpadded length of each row
    pub lengths: Vec<usize>,
}

// ─── TokenBatcher ─────────────────────────────────────────────────────────────
#[derive(Clone, Debug)]
pub struct TokenBatcher<B: Backend> {
    pub device:     B::Device,
    pub padding_id: u32,
}

impl<B: Backend> TokenBatcher<B> {
    pub fn new(device: B::Device, padding_id: u32) -> Self {
        Self { device, padding_id }
    }
}

impl<B: Backend> Batcher<Vec<u32>, TokenBatch<B>> for TokenBatcher<B> {
    fn batch(&self, items: Vec<Vec<u32>>) -> TokenBatch<B> {
        let (flat, lengths, seq_len) = pad_right(&items, self.padding_id);

        let input_ids = Tensor::<B, 2, Int>::from_data(
            TensorData::new(flat, [items.len(), seq_len]),
            &self.device,
        );

        TokenBatch { input_ids, lengths }
    }
}

/// Row-major padded ids, true lengths, and the padded width.
pub fn pad_right(items: &[Vec<u32>], padding_id: u32) -> (Vec<i32>, Vec<usize>, usize) {
    let seq_len = items.iter().map(Vec::len).max().unwrap_or(0);
    let lengths = items.iter().map(Vec::len).collect();

    let flat = items
        .iter()
        .flat_map(|seq| {
            seq.iter()
                .copied()
                .chain(std::iter::repeat(padding_id))
                .take(seq_len)
                .map(|id| id as i32)
        })
        .collect();

    (flat, lengths, seq_len)
}

#[cfg(test)]
mod tests {
    use super::*;
    use burn::backend::NdArray;

    type TB = NdArray<f32>;

    #[test]
    fn test_pad_right() {
        let (flat, lengths, width) = pad_right(&[vec![5, 8, 2], vec![7]], 0);
        assert_eq!(width, 3);
        assert_eq!(lengths, vec![3, 1]);
        assert_eq!(flat, vec![5, 8, 2, 7, 0, 0]);
    }

    #[test]
    fn test_pad_right_empty() {
        let (flat, lengths, width) = pad_right(&[], 2);
        assert!(flat.is_empty());
        assert!(lengths.is_empty());
        assert_eq!(width, 0);
    }

    #[test]
    fn test_batch_tensor() {
        let batcher = TokenBatcher::<TB>::new(Default::default(), 2);
        let batch = batcher.batch(vec![vec![4], vec![1, 3, 5]]);
        assert_eq!(batch.input_ids.dims(), [2, 3]);
        assert_eq!(batch.lengths, vec![1, 3]);

        let ids: Vec<i64> = batch
            .input_ids
            .into_data()
            .convert::<i64>()
            .to_vec::<i64>()
            .unwrap();
        assert_eq!(ids, vec![4, 2, 2, 1, 3, 5]);
    }
}
