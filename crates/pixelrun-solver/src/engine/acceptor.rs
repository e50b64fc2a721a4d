// Copyright (c) 2025 Felix Kahle.
//
// Permission is hereby granted, free of charge, to any person obtaining
// a copy of this software and associated documentation files (the
// "Software"), to deal in the Software without restriction, including
// without limitation the rights to use, copy, modify, merge, publish,
// distribute, sublicense, and/or sell copies of the Software, and to
// permit persons to whom the Software is furnished to do so, subject to
// the following conditions:
//
// The above copyright notice and this permission notice shall be
// included in all copies or substantial portions of the Software.
//
// THE SOFTWARE IS PROVIDED "AS IS", WITHOUT WARRANTY OF ANY KIND,
// EXPRESS OR IMPLIED, INCLUDING BUT NOT LIMITED TO THE WARRANTIES OF
// MERCHANTABILITY, FITNESS FOR A PARTICULAR PURPOSE AND
// NONINFRINGEMENT. IN NO EVENT SHALL THE AUTHORS OR COPYRIGHT HOLDERS BE
// LIABLE FOR ANY CLAIM, DAMAGES OR OTHER LIABILITY, WHETHER IN AN ACTION
// OF CONTRACT, TORT OR OTHERWISE, ARISING FROM, OUT OF OR IN CONNECTION
// WITH THE SOFTWARE OR THE USE OR OTHER DEALINGS IN THE SOFTWARE.

/// Metropolis acceptance with an injected uniform draw in `[0, 1)`.
///
/// Improving and neutral moves always pass. Once `temperature` is at or
/// below `min_temperature` every worsening move is refused; otherwise it
/// passes with probability `exp(-delta / temperature)`.
#[inline]
pub fn metropolis(delta: f64, temperature: f64, min_temperature: f64, draw: f64) -> bool {
    if delta <= 0.0 {
        return true;
    }
    if temperature <= min_temperature || temperature <= 0.0 {
        return false;
    }
    draw < (-delta / temperature).exp()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_non_worsening_moves_always_pass() {
        assert!(metropolis(-1.0, 1.0, 0.0, 0.999));
        assert!(metropolis(0.0, 0.0, 0.0, 0.999));
        assert!(metropolis(-0.5, 0.01, 0.01, 0.5));
    }

    #[test]
    fn test_frozen_rejects_worsening() {
        assert!(!metropolis(0.1, 0.01, 0.01, 0.0));
        assert!(!metropolis(1.0, 0.0, 0.0, 0.0));
    }

    #[test]
    fn test_probability_threshold() {
        // exp(-1) ~= 0.3679
        assert!(metropolis(1.0, 1.0, 0.0, 0.36));
        assert!(!metropolis(1.0, 1.0, 0.0, 0.37));
        // Hotter accepts more.
        assert!(metropolis(1.0, 10.0, 0.0, 0.9));
        assert!(!metropolis(1.0, 0.1, 0.0, 0.001));
    }
}
