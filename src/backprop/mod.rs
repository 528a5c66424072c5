//! Output-layer gradient quantities for the chain-rule widget.
//!
//! The widget animates the error signal flowing backwards and displays
//! the derivation notebook: under MSE loss the output delta is
//! `δk = (Tk − Ok) · f'(net_k)` and the weight update is
//! `Δw_jk = η · δk · Oj`.

/// Derivative of the logistic sigmoid expressed through its output:
/// `f'(net) = O · (1 − O)`.
pub fn sigmoid_grad(output: f64) -> f64 {
    output * (1.0 - output)
}

/// Output-layer delta `δk = error · f'(net_k)`, where `error` is
/// `(Target − Out)`.
pub fn output_delta(error: f64, activation_grad: f64) -> f64 {
    error * activation_grad
}

/// Weight update `Δw_jk = η · δk · Oj`.
pub fn weight_update(learning_rate: f64, delta: f64, upstream_output: f64) -> f64 {
    learning_rate * delta * upstream_output
}
