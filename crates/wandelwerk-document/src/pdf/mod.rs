// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// PDF module — reading existing PDFs and generating new ones.

pub mod reader;
pub mod writer;

pub use reader::{PdfInfo, PdfReader};
pub use writer::{PdfWriter, TextLayout};
