#![cfg_attr(not(test), no_std)]
#![doc = include_str!("../README.md")]

#[macro_use]
mod macros;

pub mod action;
pub mod caps_word;
pub mod config;
pub mod encoder;
pub mod event;
pub mod hid;
pub mod hid_state;
pub mod keyboard;
pub mod keycode;
pub mod keymap;
pub mod layout;
#[macro_use]
pub mod layout_macro;
pub mod tap_hold;
