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

//! The subset of Tari script needed to build and spend standard outputs: the `Nop` script that leaves the input data
//! untouched, `PushPubKey` for one-sided payments and `Drop`. Input data is an execution stack of type-tagged items.

use std::{fmt, io};

use serde::{de, Deserialize, Deserializer, Serialize, Serializer};
use tari_utilities::ByteArray;
use thiserror::Error;

use crate::{
    consensus::{ConsensusEncoding, ConsensusEncodingSized},
    types::{Commitment, PublicKey, KEY_LENGTH},
};

pub const OP_DROP: u8 = 0x70;
pub const OP_NOP: u8 = 0x73;
pub const OP_PUSH_PUBKEY: u8 = 0x7e;

pub const TYPE_NUMBER: u8 = 1;
pub const TYPE_HASH: u8 = 2;
pub const TYPE_COMMITMENT: u8 = 3;
pub const TYPE_PUBKEY: u8 = 4;

/// The maximum number of items an execution stack may hold
pub const MAX_STACK_SIZE: usize = 255;

#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ScriptError {
    #[error("The script failed with an explicit Return")]
    Return,
    #[error("The stack exceeded the maximum size")]
    StackOverflow,
    #[error("The script tried to pop an element off an empty stack")]
    StackUnderflow,
    #[error("The script completed with more or less than one item on the stack")]
    NonUnitLengthStack,
    #[error("The script did not leave a public key on the stack")]
    NotAPublicKey,
    #[error("Invalid opcode byte {0:#04x}")]
    InvalidOpcode(u8),
    #[error("Invalid input data")]
    InvalidInput,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Opcode {
    /// Drops the top stack item
    Drop,
    /// Does nothing
    Nop,
    /// Pushes the public key onto the stack
    PushPubKey(Box<PublicKey>),
}

impl Opcode {
    fn to_bytes(&self, array: &mut Vec<u8>) {
        match self {
            Opcode::Drop => array.push(OP_DROP),
            Opcode::Nop => array.push(OP_NOP),
            Opcode::PushPubKey(p) => {
                array.push(OP_PUSH_PUBKEY);
                array.extend_from_slice(p.as_bytes());
            },
        }
    }

    fn read_next(bytes: &[u8]) -> Result<(Opcode, &[u8]), ScriptError> {
        let code = *bytes.first().ok_or(ScriptError::InvalidInput)?;
        match code {
            OP_DROP => Ok((Opcode::Drop, &bytes[1..])),
            OP_NOP => Ok((Opcode::Nop, &bytes[1..])),
            OP_PUSH_PUBKEY => {
                let key = bytes.get(1..=KEY_LENGTH).ok_or(ScriptError::InvalidInput)?;
                let p = PublicKey::from_canonical_bytes(key).map_err(|_| ScriptError::InvalidInput)?;
                Ok((Opcode::PushPubKey(Box::new(p)), &bytes[1 + KEY_LENGTH..]))
            },
            b => Err(ScriptError::InvalidOpcode(b)),
        }
    }
}

/// A script is a sequence of opcodes. It is executed against the input data stack provided by the spender.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TariScript {
    script: Vec<Opcode>,
}

impl TariScript {
    pub fn new(script: Vec<Opcode>) -> Self {
        TariScript { script }
    }

    pub fn as_bytes(&self) -> Vec<u8> {
        self.script.iter().fold(Vec::new(), |mut bytes, op| {
            op.to_bytes(&mut bytes);
            bytes
        })
    }

    pub fn from_bytes(bytes: &[u8]) -> Result<Self, ScriptError> {
        let mut script = Vec::new();
        let mut rest = bytes;
        while !rest.is_empty() {
            let (op, remaining) = Opcode::read_next(rest)?;
            script.push(op);
            rest = remaining;
        }
        Ok(TariScript { script })
    }

    /// Runs the script against the input stack. A successful run leaves exactly one item on the stack, which is
    /// returned.
    pub fn execute(&self, inputs: &ExecutionStack) -> Result<StackItem, ScriptError> {
        let mut stack = inputs.clone();
        for op in &self.script {
            match op {
                Opcode::Drop => {
                    stack.pop()?;
                },
                Opcode::Nop => {},
                Opcode::PushPubKey(p) => stack.push(StackItem::PublicKey(*p.clone()))?,
            }
        }
        if stack.size() != 1 {
            return Err(ScriptError::NonUnitLengthStack);
        }
        stack.pop()
    }

    /// Executes the script and returns the public key it leaves on the stack. This is the key the script signature
    /// must be made with.
    pub fn execute_to_public_key(&self, inputs: &ExecutionStack) -> Result<PublicKey, ScriptError> {
        match self.execute(inputs)? {
            StackItem::PublicKey(p) => Ok(p),
            _ => Err(ScriptError::NotAPublicKey),
        }
    }
}

impl Default for TariScript {
    fn default() -> Self {
        TariScript::new(vec![Opcode::Nop])
    }
}

impl ConsensusEncoding for TariScript {
    fn consensus_encode<W: io::Write>(&self, writer: &mut W) -> Result<(), io::Error> {
        self.as_bytes().consensus_encode(writer)
    }
}

impl ConsensusEncodingSized for TariScript {}

impl fmt::Display for TariScript {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let ops = self
            .script
            .iter()
            .map(|op| match op {
                Opcode::Drop => "Drop".to_string(),
                Opcode::Nop => "Nop".to_string(),
                Opcode::PushPubKey(p) => format!("PushPubKey({})", hex::encode(p.as_bytes())),
            })
            .collect::<Vec<_>>();
        write!(f, "{}", ops.join(" "))
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StackItem {
    Number(i64),
    Hash([u8; 32]),
    Commitment(Commitment),
    PublicKey(PublicKey),
}

impl StackItem {
    fn to_bytes(&self, array: &mut Vec<u8>) {
        match self {
            StackItem::Number(v) => {
                array.push(TYPE_NUMBER);
                array.extend_from_slice(&v.to_le_bytes());
            },
            StackItem::Hash(h) => {
                array.push(TYPE_HASH);
                array.extend_from_slice(&h[..]);
            },
            StackItem::Commitment(c) => {
                array.push(TYPE_COMMITMENT);
                array.extend_from_slice(c.as_bytes());
            },
            StackItem::PublicKey(p) => {
                array.push(TYPE_PUBKEY);
                array.extend_from_slice(p.as_bytes());
            },
        }
    }

    fn read_next(bytes: &[u8]) -> Option<(Self, &[u8])> {
        let code = *bytes.first()?;
        let body = &bytes[1..];
        match code {
            TYPE_NUMBER => {
                let mut arr = [0u8; 8];
                arr.copy_from_slice(body.get(..8)?);
                Some((StackItem::Number(i64::from_le_bytes(arr)), &body[8..]))
            },
            TYPE_HASH => {
                let mut arr = [0u8; 32];
                arr.copy_from_slice(body.get(..32)?);
                Some((StackItem::Hash(arr), &body[32..]))
            },
            TYPE_COMMITMENT => {
                let p = PublicKey::from_canonical_bytes(body.get(..KEY_LENGTH)?).ok()?;
                Some((
                    StackItem::Commitment(Commitment::from_public_key(&p)),
                    &body[KEY_LENGTH..],
                ))
            },
            TYPE_PUBKEY => {
                let p = PublicKey::from_canonical_bytes(body.get(..KEY_LENGTH)?).ok()?;
                Some((StackItem::PublicKey(p), &body[KEY_LENGTH..]))
            },
            _ => None,
        }
    }
}

impl From<PublicKey> for StackItem {
    fn from(p: PublicKey) -> Self {
        StackItem::PublicKey(p)
    }
}

impl From<Commitment> for StackItem {
    fn from(c: Commitment) -> Self {
        StackItem::Commitment(c)
    }
}

/// The input data a spender provides to a script
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExecutionStack {
    items: Vec<StackItem>,
}

impl ExecutionStack {
    pub fn new(items: Vec<StackItem>) -> Self {
        ExecutionStack { items }
    }

    pub fn size(&self) -> usize {
        self.items.len()
    }

    pub fn push(&mut self, item: StackItem) -> Result<(), ScriptError> {
        if self.size() >= MAX_STACK_SIZE {
            return Err(ScriptError::StackOverflow);
        }
        self.items.push(item);
        Ok(())
    }

    pub fn pop(&mut self) -> Result<StackItem, ScriptError> {
        self.items.pop().ok_or(ScriptError::StackUnderflow)
    }

    /// Each item is a type tag followed by its fixed width payload, e.g. `0x04 ∥ 32-byte public key`
    pub fn as_bytes(&self) -> Vec<u8> {
        self.items.iter().fold(Vec::new(), |mut bytes, item| {
            item.to_bytes(&mut bytes);
            bytes
        })
    }

    pub fn from_bytes(bytes: &[u8]) -> Result<Self, ScriptError> {
        let mut stack = ExecutionStack { items: Vec::new() };
        let mut byte_str = bytes;
        while !byte_str.is_empty() {
            match StackItem::read_next(byte_str) {
                Some((item, b)) => {
                    stack.push(item)?;
                    byte_str = b;
                },
                None => return Err(ScriptError::InvalidInput),
            }
        }
        Ok(stack)
    }
}

impl ConsensusEncoding for ExecutionStack {
    fn consensus_encode<W: io::Write>(&self, writer: &mut W) -> Result<(), io::Error> {
        self.as_bytes().consensus_encode(writer)
    }
}

impl ConsensusEncodingSized for ExecutionStack {}

macro_rules! bytes_serde {
    ($ty:ty) => {
        impl Serialize for $ty {
            fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
            where S: Serializer {
                crate::serializers::hex::serialize(&self.as_bytes(), serializer)
            }
        }

        impl<'de> Deserialize<'de> for $ty {
            fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
            where D: Deserializer<'de> {
                let bytes: Vec<u8> = crate::serializers::hex::deserialize(deserializer)?;
                Self::from_bytes(&bytes).map_err(de::Error::custom)
            }
        }
    };
}

bytes_serde!(TariScript);
bytes_serde!(ExecutionStack);

/// Builds a script from opcodes, e.g. `script!(Nop)` or `script!(PushPubKey(Box::new(p)))`
#[macro_export]
macro_rules! script {
    ($($opcode:ident$(($($var:expr),+))?) +) => {{
        use $crate::script::Opcode;
        let script = vec![$(Opcode::$opcode $(($($var),+))?),+];
        $crate::script::TariScript::new(script)
    }}
}

/// Builds an input stack, e.g. `inputs!(public_key)`
#[macro_export]
macro_rules! inputs {
    ($($input:expr),+) => {{
        use $crate::script::{ExecutionStack, StackItem};
        let items = vec![$(StackItem::from($input)),+];
        ExecutionStack::new(items)
    }}
}

#[cfg(test)]
mod test {
    use rand::rngs::OsRng;
    use tari_crypto::keys::PublicKey as _;

    use super::*;

    #[test]
    fn nop_script_is_a_single_byte() {
        assert_eq!(script!(Nop).as_bytes(), vec![0x73]);
        assert_eq!(TariScript::default().to_consensus_bytes(), vec![0x01, 0x73]);
    }

    #[test]
    fn input_data_is_type_tagged() {
        let (_, p) = PublicKey::random_keypair(&mut OsRng);
        let stack = inputs!(p.clone());
        let bytes = stack.as_bytes();
        assert_eq!(bytes.len(), 33);
        assert_eq!(bytes[0], TYPE_PUBKEY);
        assert_eq!(&bytes[1..], p.as_bytes());
        assert_eq!(ExecutionStack::from_bytes(&bytes).unwrap(), stack);
    }

    #[test]
    fn nop_leaves_the_input_public_key() {
        let (_, p) = PublicKey::random_keypair(&mut OsRng);
        let result = script!(Nop).execute_to_public_key(&inputs!(p.clone())).unwrap();
        assert_eq!(result, p);
    }

    #[test]
    fn push_pubkey_then_drop() {
        let (_, p1) = PublicKey::random_keypair(&mut OsRng);
        let (_, p2) = PublicKey::random_keypair(&mut OsRng);
        let script = script!(PushPubKey(Box::new(p2.clone())));
        let bytes = script.as_bytes();
        assert_eq!(bytes[0], OP_PUSH_PUBKEY);
        assert_eq!(TariScript::from_bytes(&bytes).unwrap(), script);

        // Two items left on the stack
        assert_eq!(
            script.execute(&inputs!(p1.clone())),
            Err(ScriptError::NonUnitLengthStack)
        );
        let script = script!(Drop PushPubKey(Box::new(p2.clone())));
        assert_eq!(script.execute_to_public_key(&inputs!(p1)).unwrap(), p2);
    }

    #[test]
    fn empty_and_malformed_inputs_fail() {
        assert_eq!(
            script!(Nop).execute(&ExecutionStack::default()),
            Err(ScriptError::NonUnitLengthStack)
        );
        assert_eq!(script!(Drop).execute(&ExecutionStack::default()), Err(ScriptError::StackUnderflow));
        assert_eq!(TariScript::from_bytes(&[0xff]), Err(ScriptError::InvalidOpcode(0xff)));
        assert_eq!(ExecutionStack::from_bytes(&[TYPE_PUBKEY, 1, 2]), Err(ScriptError::InvalidInput));
        let number = StackItem::Number(-1);
        let stack = ExecutionStack::new(vec![number.clone(), StackItem::Hash([3u8; 32])]);
        assert_eq!(ExecutionStack::from_bytes(&stack.as_bytes()).unwrap(), stack);
        assert_eq!(
            script!(Nop).execute_to_public_key(&ExecutionStack::new(vec![number])),
            Err(ScriptError::NotAPublicKey)
        );
    }

    #[test]
    fn it_serializes_as_hex() {
        let json = serde_json::to_string(&script!(Nop)).unwrap();
        assert_eq!(json, "\"73\"");
        let script: TariScript = serde_json::from_str(&json).unwrap();
        assert_eq!(script, script!(Nop));
    }
}
