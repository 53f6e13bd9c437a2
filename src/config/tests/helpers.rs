//! Layer builders for configuration merge tests.

use ortho_config::MergeComposer;
use serde_json::Value;

use crate::OctostoreConfig;

/// One configuration source, lowest precedence first in declaration order.
#[derive(Debug, Clone)]
pub enum Layer {
    Defaults(Value),
    File(Value),
    Environment(Value),
    Cli(Value),
}

impl Layer {
    fn push_onto(self, composer: &mut MergeComposer) {
        match self {
            Self::Defaults(value) => composer.push_defaults(value),
            Self::File(value) => composer.push_file(value, None),
            Self::Environment(value) => composer.push_environment(value),
            Self::Cli(value) => composer.push_cli(value),
        }
    }
}

/// Merges `layers` in order into an [`OctostoreConfig`].
pub fn merge(layers: impl IntoIterator<Item = Layer>) -> OctostoreConfig {
    let mut composer = MergeComposer::new();
    for layer in layers {
        layer.push_onto(&mut composer);
    }

    OctostoreConfig::merge_from_layers(composer.layers()).expect("layers should merge")
}
