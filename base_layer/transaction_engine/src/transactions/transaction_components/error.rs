//  Copyright 2022. The Tari Project
//
//  Redistribution and use in source and binary forms, with or without modification, are permitted provided that the
//  following conditions are met:
//
//  1. Redistributions of source code must retain the above copyright notice, this list of conditions and the following
//  disclaimer.
//
//  2. Redistributions in binary form must reproduce the above copyright notice, this list of conditions and the
//  following disclaimer in the documentation and/or other materials provided with the distribution.
//
//  3. Neither the name of the copyright holder nor the names of its contributors may be used to endorse or promote
//  products derived from this software without specific prior written permission.
//
//  THIS SOFTWARE IS PROVIDED BY THE COPYRIGHT HOLDERS AND CONTRIBUTORS "AS IS" AND ANY EXPRESS OR IMPLIED WARRANTIES,
//  INCLUDING, BUT NOT LIMITED TO, THE IMPLIED WARRANTIES OF MERCHANTABILITY AND FITNESS FOR A PARTICULAR PURPOSE ARE
//  DISCLAIMED. IN NO EVENT SHALL THE COPYRIGHT HOLDER OR CONTRIBUTORS BE LIABLE FOR ANY DIRECT, INDIRECT, INCIDENTAL,
//  SPECIAL, EXEMPLARY, OR CONSEQUENTIAL DAMAGES (INCLUDING, BUT NOT LIMITED TO, PROCUREMENT OF SUBSTITUTE GOODS OR
//  SERVICES; LOSS OF USE, DATA, OR PROFITS; OR BUSINESS INTERRUPTION) HOWEVER CAUSED AND ON ANY THEORY OF LIABILITY,
//  WHETHER IN CONTRACT, STRICT LIABILITY, OR TORT (INCLUDING NEGLIGENCE OR OTHERWISE) ARISING IN ANY WAY OUT OF THE
//  USE OF THIS SOFTWARE, EVEN IF ADVISED OF THE POSSIBILITY OF SUCH DAMAGE.
//
// Portions of this file were originally copyrighted (c) 2018 The Grin Developers, issued under the Apache License,
// Version 2.0, available at http://www.apache.org/licenses/LICENSE-2.0.

use thiserror::Error;

use crate::{crypto::AdapterError, script::ScriptError, transactions::transaction_components::EncryptionError};

#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum TransactionError {
    #[error("Error validating the transaction: {0}")]
    ValidationError(String),
    #[error("Signature is invalid: {0}")]
    InvalidSignatureError(String),
    #[error("Transaction kernel does not contain a signature")]
    NoSignatureError,
    #[error("A transaction needs at least one input or output")]
    EmptyTransaction,
    #[error("Range proof is invalid for output {commitment}")]
    InvalidRangeProof { commitment: String },
    #[error("The sum of commitments does not balance against the kernel excess and offset")]
    ValidationUnbalanced,
    #[error("The script offset in body does not balance")]
    ScriptOffset,
    #[error("Tari script error: {0}")]
    ScriptError(#[from] ScriptError),
    #[error("Only coinbase outputs may have metadata")]
    NonCoinbaseHasMetadata,
    #[error("Metadata size is {len} but max is {max}")]
    InvalidMetadataSize { len: usize, max: usize },
    #[error("Unique id size is {len} but max is {max}")]
    InvalidUniqueIdSize { len: usize, max: usize },
    #[error("Maturity {maturity} does not fit the single byte consensus encoding (max {max})")]
    MaturityOutOfRange { maturity: u64, max: u64 },
    #[error("Value encryption failed: {0}")]
    EncryptionError(#[from] EncryptionError),
    #[error("Commitment/signature adapter error: {0}")]
    AdapterError(#[from] AdapterError),
}
