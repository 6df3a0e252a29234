// ============================================================
// Layer 5 — Padding-Aware Parameter Update
// ============================================================
// One optimizer step that never moves the padding embedding row:
//
//   loss.backward()
//     → GradientsParams::from_grads
//     → zero the padding row of the embedding gradient
//     → optimizer.step()
//
// Epochs, batching and checkpoint cadence belong to the caller.
// The step consumes the model and returns the updated one, so no
// forward pass can read parameters halfway through an update.
//
// Reference: Burn Book §5 (Training)

use burn::{
    optim::{GradientsParams, Optimizer},
    prelude::*,
    tensor::backend::AutodiffBackend,
};

use crate::ml::model::LanguageModel;

pub fn padding_aware_step<B, O>(
    model: LanguageModel<B>,
    optim: &mut O,
    lr:    f64,
    loss:  Tensor<B, 1>,
) -> LanguageModel<B>
where
    B: AutodiffBackend,
    O: Optimizer<LanguageModel<B>, B>,
{
    let grads = loss.backward();
    let mut grads = GradientsParams::from_grads(grads, &model);
    model.embedding.mask_padding_grad(&mut grads);
    optim.step(lr, model, grads)
}
