use crate::errors::Result;
use crate::traits::BlurBackend;
use ndarray::prelude::*;
use parking_lot::Mutex;

/// Blur backend for tests.
///
/// Returns its input unchanged, except that single channel images come back as rank 2.
#[derive(Debug, Default)]
pub struct MockBlurBackend {
    calls: Mutex<Vec<(Vec<usize>, usize)>>,
}

impl MockBlurBackend {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of `box_blur` calls so far.
    pub fn calls(&self) -> usize {
        self.calls.lock().len()
    }

    /// Input shape and kernel size of the latest call.
    pub fn last_call(&self) -> Option<(Vec<usize>, usize)> {
        self.calls.lock().last().cloned()
    }
}

impl BlurBackend for MockBlurBackend {
    fn box_blur(&self, image: ArrayViewD<f32>, kernel_size: usize) -> Result<ArrayD<f32>> {
        self.calls.lock().push((image.shape().to_vec(), kernel_size));

        // テスト用の簡易実装：単一チャンネルのみ次元を落とす
        if image.ndim() == 3 && image.len_of(Axis(2)) == 1 {
            return Ok(image.index_axis_move(Axis(2), 0).to_owned());
        }
        Ok(image.to_owned())
    }

    fn name(&self) -> &'static str {
        "mock"
    }
}
