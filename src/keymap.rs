use crate::action::KeyAction;
use crate::event::KeyEvent;

/// Keymap represents the stack of layers.
///
/// The conception of Keymap is borrowed from QMK: <https://docs.qmk.fm/#/keymap>.
///
/// Keymap is bound to the actual pcb matrix definition. The runtime detects
/// hardware key strokes and the tuple `(row, col, layer)` retrieves the action.
pub struct KeyMap<'a, const ROW: usize, const COL: usize, const NUM_LAYER: usize> {
    /// Layers
    pub(crate) layers: &'a mut [[[KeyAction; COL]; ROW]; NUM_LAYER],
    /// Current state of each layer
    layer_state: [bool; NUM_LAYER],
    /// Default layer number, max: 32
    default_layer: u8,
    /// Layer cache: the layer a pressed key was resolved on, so its release
    /// resolves on the same layer even if the layer state changed in between
    layer_cache: [[u8; COL]; ROW],
}

impl<'a, const ROW: usize, const COL: usize, const NUM_LAYER: usize> KeyMap<'a, ROW, COL, NUM_LAYER> {
    pub fn new(action_map: &'a mut [[[KeyAction; COL]; ROW]; NUM_LAYER]) -> Self {
        KeyMap {
            layers: action_map,
            layer_state: [false; NUM_LAYER],
            default_layer: 0,
            layer_cache: [[0; COL]; ROW],
        }
    }

    /// Fetch the action in keymap at the given position on the given layer
    pub(crate) fn get_action_at(&self, row: usize, col: usize, layer_num: usize) -> KeyAction {
        self.layers[layer_num][row][col]
    }

    /// Fetch the action in keymap, with layer cache
    pub(crate) fn get_action_with_layer_cache(&mut self, key_event: KeyEvent) -> KeyAction {
        let row = key_event.row as usize;
        let col = key_event.col as usize;
        if !key_event.pressed {
            // Releasing a pressed key, use cached layer and restore the cache
            let layer = self.pop_layer_from_cache(row, col);
            return self.layers[layer as usize][row][col];
        }

        // Iterate from higher layer to lower layer, the lowest checked layer is the default layer
        for (layer_idx, layer) in self.layers.iter().enumerate().rev() {
            if self.layer_state[layer_idx] || layer_idx as u8 == self.default_layer {
                // This layer is activated
                let action = layer[row][col];
                if action == KeyAction::Transparent {
                    continue;
                }

                // Found a valid action in the layer, cache it
                self.save_layer_cache(row, col, layer_idx as u8);

                return action;
            }

            if layer_idx as u8 == self.default_layer {
                // No action
                break;
            }
        }

        KeyAction::No
    }

    /// Resolve the action at a position on the currently activated layers,
    /// without touching the layer cache. Used for timing queries.
    pub(crate) fn get_action(&self, row: usize, col: usize) -> KeyAction {
        for (layer_idx, layer) in self.layers.iter().enumerate().rev() {
            if self.layer_state[layer_idx] || layer_idx as u8 == self.default_layer {
                let action = layer[row][col];
                if action == KeyAction::Transparent {
                    continue;
                }
                return action;
            }

            if layer_idx as u8 == self.default_layer {
                break;
            }
        }

        KeyAction::No
    }

    pub(crate) fn get_activated_layer(&self) -> u8 {
        for (layer_idx, _) in self.layers.iter().enumerate().rev() {
            if self.layer_state[layer_idx] || layer_idx as u8 == self.default_layer {
                return layer_idx as u8;
            }
        }

        self.default_layer
    }

    fn pop_layer_from_cache(&mut self, row: usize, col: usize) -> u8 {
        let layer = self.layer_cache[row][col];
        self.layer_cache[row][col] = self.default_layer;

        layer
    }

    fn save_layer_cache(&mut self, row: usize, col: usize, layer_num: u8) {
        self.layer_cache[row][col] = layer_num;
    }

    /// Activate given layer
    pub(crate) fn activate_layer(&mut self, layer_num: u8) {
        if layer_num as usize >= NUM_LAYER {
            warn!(
                "Not a valid layer {}, keyboard supports only {} layers",
                layer_num, NUM_LAYER
            );
            return;
        }
        self.layer_state[layer_num as usize] = true;
    }

    /// Deactivate given layer
    pub(crate) fn deactivate_layer(&mut self, layer_num: u8) {
        if layer_num as usize >= NUM_LAYER {
            warn!(
                "Not a valid layer {}, keyboard supports only {} layers",
                layer_num, NUM_LAYER
            );
            return;
        }
        self.layer_state[layer_num as usize] = false;
    }

    /// Toggle given layer
    pub(crate) fn toggle_layer(&mut self, layer_num: u8) {
        if layer_num as usize >= NUM_LAYER {
            warn!(
                "Not a valid layer {}, keyboard supports only {} layers",
                layer_num, NUM_LAYER
            );
            return;
        }

        self.layer_state[layer_num as usize] = !self.layer_state[layer_num as usize];
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::action::Action;
    use crate::keycode::KeyCode;
    use crate::{a, k, layer, mo};

    fn test_layers() -> [[[KeyAction; 2]; 1]; 2] {
        [
            layer!([[k!(A), mo!(1)]]),
            layer!([[k!(B), a!(Transparent)]]),
        ]
    }

    fn press(row: u8, col: u8) -> KeyEvent {
        KeyEvent { row, col, pressed: true }
    }

    fn release(row: u8, col: u8) -> KeyEvent {
        KeyEvent { row, col, pressed: false }
    }

    #[test]
    fn test_layer_activation_and_transparency() {
        let mut layers = test_layers();
        let mut keymap = KeyMap::new(&mut layers);

        assert_eq!(keymap.get_activated_layer(), 0);
        assert_eq!(
            keymap.get_action_with_layer_cache(press(0, 0)),
            KeyAction::Single(Action::Key(KeyCode::A))
        );
        keymap.get_action_with_layer_cache(release(0, 0));

        keymap.activate_layer(1);
        assert_eq!(keymap.get_activated_layer(), 1);
        assert_eq!(
            keymap.get_action_with_layer_cache(press(0, 0)),
            KeyAction::Single(Action::Key(KeyCode::B))
        );
        // Transparent cell falls through to layer 0
        assert_eq!(
            keymap.get_action_with_layer_cache(press(0, 1)),
            KeyAction::Single(Action::LayerOn(1))
        );
    }

    #[test]
    fn test_release_uses_cached_layer() {
        let mut layers = test_layers();
        let mut keymap = KeyMap::new(&mut layers);

        keymap.activate_layer(1);
        assert_eq!(
            keymap.get_action_with_layer_cache(press(0, 0)),
            KeyAction::Single(Action::Key(KeyCode::B))
        );
        // Layer deactivates while the key is held; the release still resolves on layer 1
        keymap.deactivate_layer(1);
        assert_eq!(
            keymap.get_action_with_layer_cache(release(0, 0)),
            KeyAction::Single(Action::Key(KeyCode::B))
        );
        // Following press resolves on layer 0 again
        assert_eq!(
            keymap.get_action_with_layer_cache(press(0, 0)),
            KeyAction::Single(Action::Key(KeyCode::A))
        );
    }

    #[test]
    fn test_invalid_layer_is_ignored() {
        let mut layers = test_layers();
        let mut keymap = KeyMap::new(&mut layers);

        keymap.activate_layer(7);
        assert_eq!(keymap.get_activated_layer(), 0);
        keymap.toggle_layer(7);
        assert_eq!(keymap.get_activated_layer(), 0);
    }
}
