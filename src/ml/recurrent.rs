// ============================================================
// Layer 5 — Residual Recurrent Block
// ============================================================
// A stack of recurrent cells with a residual shortcut around each:
//
//   h[l][t] = cell_l.step(x[l][t], h[l][t-1])     h[l][-1] = 0
//   y[l][t] = h[l][t] + x[l][t]
//   x[l+1]  = dropout(y[l])                        for l < L-1
//   output  = y[L-1]                               (not dropped)
//
// Time steps run strictly in order. Layer l+1 starts only once
// layer l has produced its whole sequence.
//
// The block only knows the RecurrentCell trait. The concrete rule
// (basic tanh RNN or gated GRU) comes from a cell factory chosen
// at construction.
//
// Reference: Cho et al. (2014) GRU
//            He et al. (2016) Residual connections

use burn::{
    nn::{Dropout, DropoutConfig, Linear, LinearConfig},
    prelude::*,
    tensor::activation::{sigmoid, tanh},
};

use crate::domain::error::{ModelError, ModelResult};
use crate::ml::config::CellVariant;

// ─── RecurrentCell ────────────────────────────────────────────────────────────
/// Consume the current input and the previous state, produce the new state.
pub trait RecurrentCell<B: Backend> {
    fn hidden_dim(&self) -> usize;

    /// input, state: [batch, hidden_dim] → [batch, hidden_dim]
    fn step(&self, input: Tensor<B, 2>, state: Tensor<B, 2>) -> Tensor<B, 2>;
}

// ─── BasicCell ────────────────────────────────────────────────────────────────
/// `h' = tanh(W_ih x + b_ih + W_hh h + b_hh)`
#[derive(Module, Debug)]
pub struct BasicCell<B: Backend> {
    pub input:    Linear<B>,
    pub hidden:   Linear<B>,
    pub d_hidden: usize,
}

impl<B: Backend> BasicCell<B> {
    pub fn new(d_hidden: usize, device: &B::Device) -> Self {
        Self {
            input:  LinearConfig::new(d_hidden, d_hidden).init(device),
            hidden: LinearConfig::new(d_hidden, d_hidden).init(device),
            d_hidden,
        }
    }
}

impl<B: Backend> RecurrentCell<B> for BasicCell<B> {
    fn hidden_dim(&self) -> usize {
        self.d_hidden
    }

    fn step(&self, input: Tensor<B, 2>, state: Tensor<B, 2>) -> Tensor<B, 2> {
        tanh(self.input.forward(input) + self.hidden.forward(state))
    }
}

// ─── GatedCell ────────────────────────────────────────────────────────────────
/// Gated recurrent unit. Gate rows are packed as [reset | update | candidate]:
///
///   r  = σ(W_ir x + b_ir + W_hr h + b_hr)
///   z  = σ(W_iz x + b_iz + W_hz h + b_hz)
///   n  = tanh(W_in x + b_in + r ⊙ (W_hn h + b_hn))
///   h' = (1 - z) ⊙ n + z ⊙ h
#[derive(Module, Debug)]
pub struct GatedCell<B: Backend> {
    pub input_gates:  Linear<B>,
    pub hidden_gates: Linear<B>,
    pub d_hidden:     usize,
}

impl<B: Backend> GatedCell<B> {
    pub fn new(d_hidden: usize, device: &B::Device) -> Self {
        Self {
            input_gates:  LinearConfig::new(d_hidden, 3 * d_hidden).init(device),
            hidden_gates: LinearConfig::new(d_hidden, 3 * d_hidden).init(device),
            d_hidden,
        }
    }
}

impl<B: Backend> RecurrentCell<B> for GatedCell<B> {
    fn hidden_dim(&self) -> usize {
        self.d_hidden
    }

    fn step(&self, input: Tensor<B, 2>, state: Tensor<B, 2>) -> Tensor<B, 2> {
        let [batch, _] = input.dims();
        let h = self.d_hidden;

        let gi = self.input_gates.forward(input);
        let gh = self.hidden_gates.forward(state.clone());
        let gate = |t: &Tensor<B, 2>, k: usize| t.clone().slice([0..batch, k * h..(k + 1) * h]);

        let reset  = sigmoid(gate(&gi, 0) + gate(&gh, 0));
        let update = sigmoid(gate(&gi, 1) + gate(&gh, 1));
        let cand   = tanh(gate(&gi, 2) + reset * gate(&gh, 2));

        update.clone().neg().add_scalar(1.0) * cand + update * state
    }
}

// ─── RecurrentCellModule ──────────────────────────────────────────────────────
/// The cell variants the model can be configured with.
#[derive(Module, Debug)]
pub enum RecurrentCellModule<B: Backend> {
    Basic(BasicCell<B>),
    Gated(GatedCell<B>),
}

impl<B: Backend> RecurrentCell<B> for RecurrentCellModule<B> {
    fn hidden_dim(&self) -> usize {
        match self {
            RecurrentCellModule::Basic(cell) => cell.hidden_dim(),
            RecurrentCellModule::Gated(cell) => cell.hidden_dim(),
        }
    }

    fn step(&self, input: Tensor<B, 2>, state: Tensor<B, 2>) -> Tensor<B, 2> {
        match self {
            RecurrentCellModule::Basic(cell) => cell.step(input, state),
            RecurrentCellModule::Gated(cell) => cell.step(input, state),
        }
    }
}

impl CellVariant {
    /// Cell factory for this variant.
    pub fn build<B: Backend>(&self, d_hidden: usize, device: &B::Device) -> RecurrentCellModule<B> {
        match self {
            CellVariant::Basic => RecurrentCellModule::Basic(BasicCell::new(d_hidden, device)),
            CellVariant::Gated => RecurrentCellModule::Gated(GatedCell::new(d_hidden, device)),
        }
    }
}

// ─── ResidualRecurrentBlock ───────────────────────────────────────────────────
#[derive(Config, Debug)]
pub struct ResidualRecurrentBlockConfig {
    pub d_hidden: usize,
    pub n_layers: usize,
    #[config(default = 0.0)]
    pub dropout:  f64,
    #[config(default = "CellVariant::Gated")]
    pub cell_variant: CellVariant,
}

impl ResidualRecurrentBlockConfig {
    pub fn init<B: Backend>(&self, device: &B::Device) -> ResidualRecurrentBlock<B> {
        let variant = self.cell_variant;
        self.init_with(device, |d_hidden, device| variant.build(d_hidden, device))
    }

    /// Build the block with cells from `factory(d_hidden, device)`, one call per layer.
    pub fn init_with<B, F>(&self, device: &B::Device, factory: F) -> ResidualRecurrentBlock<B>
    where
        B: Backend,
        F: Fn(usize, &B::Device) -> RecurrentCellModule<B>,
    {
        let cells = (0..self.n_layers)
            .map(|_| factory(self.d_hidden, device))
            .collect();
        // Between layers only; the last layer's output is left undropped.
        let dropouts = (1..self.n_layers)
            .map(|_| DropoutConfig::new(self.dropout).init())
            .collect();
        ResidualRecurrentBlock { cells, dropouts, d_hidden: self.d_hidden }
    }
}

#[derive(Module, Debug)]
pub struct ResidualRecurrentBlock<B: Backend> {
    pub cells:    Vec<RecurrentCellModule<B>>,
    /// cells.len() - 1 entries.
    pub dropouts: Vec<Dropout>,
    pub d_hidden: usize,
}

impl<B: Backend> ResidualRecurrentBlock<B> {
    /// x: [batch, seq_len, d_hidden] → [batch, seq_len, d_hidden]
    pub fn forward(&self, x: Tensor<B, 3>) -> ModelResult<Tensor<B, 3>> {
        let [batch, seq_len, features] = x.dims();
        if batch == 0 || seq_len == 0 || features != self.d_hidden {
            return Err(ModelError::ShapeMismatch {
                context:  "recurrent block input",
                expected: vec![batch.max(1), seq_len.max(1), self.d_hidden],
                actual:   vec![batch, seq_len, features],
            });
        }

        let mut x = x;
        for (layer, cell) in self.cells.iter().enumerate() {
            let y = unroll(cell, x.clone()) + x;
            x = match self.dropouts.get(layer) {
                Some(dropout) => dropout.forward(y),
                None          => y,
            };
        }
        Ok(x)
    }

    pub fn num_layers(&self) -> usize {
        self.cells.len()
    }

    pub fn hidden_dim(&self) -> usize {
        self.d_hidden
    }
}

/// Run one cell over a whole sequence from a zero state.
///
/// x: [batch, seq_len, hidden] → hidden states [batch, seq_len, hidden]
pub fn unroll<B: Backend, C: RecurrentCell<B>>(cell: &C, x: Tensor<B, 3>) -> Tensor<B, 3> {
    let [batch, seq_len, features] = x.dims();
    let mut state = Tensor::<B, 2>::zeros([batch, cell.hidden_dim()], &x.device());
    let mut states = Vec::with_capacity(seq_len);

    for t in 0..seq_len {
        let input = x
            .clone()
            .slice([0..batch, t..t + 1, 0..features])
            .squeeze::<2>(1);
        state = cell.step(input, state);
        states.push(state.clone().unsqueeze_dim::<3>(1));
    }

    Tensor::cat(states, 1)
}
