//! Tests for the metric derivation cascade
