// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

pub mod detail;
pub mod model;
pub mod state;
pub mod view;

pub use detail::*;
pub use model::*;
pub use state::*;
pub use view::*;
