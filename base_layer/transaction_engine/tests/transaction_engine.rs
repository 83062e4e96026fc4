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

use std::sync::Arc;

use tari_transaction_engine::{
    config::{KernelOffsetPolicy, TransactionEngineConfig},
    crypto::{CommitmentSignatureAdapter, RistrettoAdapter},
    script::TariScript,
    transactions::{
        tari_amount::MicroMinotari,
        transaction_components::{
            get_transaction_output_hash,
            Covenant,
            KernelFeatures,
            OutputFeatures,
            OutputType,
            Transaction,
            TransactionError,
            TransactionInput,
            TransactionOutput,
        },
        CoinbaseBuilder,
        SpendableOutput,
        TransactionBuilder,
    },
    types::{Commitment, PrivateKey},
};

fn config(kernel_offset: KernelOffsetPolicy) -> TransactionEngineConfig {
    TransactionEngineConfig {
        kernel_offset,
        ..Default::default()
    }
}

fn adapter() -> Arc<RistrettoAdapter> {
    Arc::new(RistrettoAdapter::new(&TransactionEngineConfig::default()).unwrap())
}

/// Creates `count` unspent outputs of `value` each
fn create_utxos(adapter: Arc<RistrettoAdapter>, count: usize, value: u64) -> Vec<SpendableOutput> {
    let mut funding = TransactionBuilder::new(adapter, TransactionEngineConfig::default());
    (0..count)
        .map(|_| funding.add_output(MicroMinotari(value), OutputFeatures::default()).unwrap())
        .collect()
}

fn spend(
    adapter: Arc<RistrettoAdapter>,
    policy: KernelOffsetPolicy,
    inputs: &[SpendableOutput],
    outputs: &[u64],
    fee: u64,
) -> (Transaction, Vec<SpendableOutput>) {
    let mut builder = TransactionBuilder::new(adapter, config(policy));
    builder.with_fee(MicroMinotari(fee));
    for input in inputs {
        builder.add_input(input).unwrap();
    }
    let spendables = outputs
        .iter()
        .map(|v| builder.add_output(MicroMinotari(*v), OutputFeatures::default()).unwrap())
        .collect();
    (builder.build().unwrap(), spendables)
}

fn assert_metadata_signature_verifies(adapter: &RistrettoAdapter, output: &TransactionOutput) {
    let challenge = TransactionOutput::build_metadata_signature_challenge(
        output.metadata_signature.public_nonce(),
        &output.script,
        &output.features,
        &output.sender_offset_public_key,
        &output.commitment,
        &output.covenant,
        &output.encrypted_value,
        output.minimum_value_promise,
    );
    let commitment = adapter.commitment_add_public_key(&output.commitment, &output.sender_offset_public_key);
    assert!(adapter.verify_commitment_signature(&output.metadata_signature, &commitment, &challenge));
}

fn assert_script_signature_verifies(adapter: &RistrettoAdapter, input: &TransactionInput, spent: &SpendableOutput) {
    let script_public_key = adapter.public_key_from_secret(&spent.script_private_key);
    let challenge = TransactionInput::build_script_challenge(
        input.script_signature.public_nonce(),
        &input.script,
        &input.input_data,
        &script_public_key,
        &input.commitment,
    );
    let commitment = adapter.commitment_add_public_key(&input.commitment, &script_public_key);
    assert!(adapter.verify_commitment_signature(&input.script_signature, &commitment, &challenge));
}

#[test]
fn signatures_verify_for_one_to_five_inputs_and_outputs() {
    let _ = env_logger::try_init();
    let adapter = adapter();
    for num_inputs in 1..=5usize {
        for num_outputs in 1..=5usize {
            let fee = 7;
            let utxos = create_utxos(adapter.clone(), num_inputs, 1_000);
            let available = 1_000 * num_inputs as u64 - fee;
            let mut values = vec![available / num_outputs as u64; num_outputs];
            values[0] += available % num_outputs as u64;

            let (tx, _) = spend(adapter.clone(), KernelOffsetPolicy::Random, &utxos, &values, fee);
            assert_eq!(tx.body.inputs().len(), num_inputs);
            assert_eq!(tx.body.outputs().len(), num_outputs);
            for output in tx.body.outputs() {
                assert_metadata_signature_verifies(&adapter, output);
            }
            for input in tx.body.inputs() {
                let spent = utxos.iter().find(|u| u.output.commitment == input.commitment).unwrap();
                assert_script_signature_verifies(&adapter, input, spent);
            }
            tx.validate_internal_consistency(None, adapter.as_ref()).unwrap();
        }
    }
}

#[test]
fn a_negative_key_sum_wraps_modulo_the_group_order() {
    let adapter = adapter();
    let one = adapter.secret_key_from_value(1);
    // The largest scalar, so any output key is numerically smaller than the input key
    let minus_one = adapter.subtract_secret_keys(&PrivateKey::default(), &one);
    assert_eq!(adapter.add_secret_keys(&minus_one, &one), PrivateKey::default());

    let utxo = SpendableOutput::build(
        adapter.as_ref(),
        MicroMinotari(500),
        OutputFeatures::default(),
        TariScript::default(),
        Covenant::default(),
        minus_one,
        adapter.random_secret_key(),
        adapter.random_secret_key(),
    )
    .unwrap();
    let (tx, outputs) = spend(adapter.clone(), KernelOffsetPolicy::Zero, &[utxo], &[490], 10);

    // k_out - (l - 1) == k_out + 1 (mod l)
    let expected_excess_key = adapter.add_secret_keys(&outputs[0].spending_key, &one);
    let kernel = &tx.body.kernels()[0];
    assert_eq!(kernel.excess, adapter.commit(&expected_excess_key, 0));
    kernel.verify_signature(adapter.as_ref()).unwrap();
    tx.validate_internal_consistency(None, adapter.as_ref()).unwrap();
}

#[test]
fn commitments_balance_against_the_kernel_and_fee() {
    let adapter = adapter();
    let utxos = create_utxos(adapter.clone(), 3, 2_000);
    let (tx, _) = spend(adapter.clone(), KernelOffsetPolicy::Random, &utxos, &[2_500, 3_475], 25);

    let sum = |commitments: Vec<Commitment>| {
        commitments
            .into_iter()
            .fold(adapter.commit(&PrivateKey::default(), 0), |acc, c| adapter.add_commitments(&acc, &c))
    };
    let outputs = sum(tx.body.outputs().iter().map(|o| o.commitment.clone()).collect());
    let inputs = sum(tx.body.inputs().iter().map(|i| i.commitment.clone()).collect());
    let lhs = adapter.add_commitments(
        &adapter.subtract_commitments(&outputs, &inputs),
        &adapter.commit(&PrivateKey::default(), 25),
    );
    let rhs = adapter.add_commitments(&tx.body.kernels()[0].excess, &adapter.commit(&tx.offset, 0));
    assert_eq!(lhs, rhs);
}

#[test]
fn an_unbalanced_spend_builds_but_does_not_validate() {
    let adapter = adapter();
    let utxos = create_utxos(adapter.clone(), 1, 1_000);

    let (balanced, _) = spend(adapter.clone(), KernelOffsetPolicy::Random, &utxos, &[950], 50);
    balanced.validate_internal_consistency(None, adapter.as_ref()).unwrap();
    assert_eq!(balanced.get_total_fee(), Ok(MicroMinotari(50)));

    let (unbalanced, _) = spend(adapter.clone(), KernelOffsetPolicy::Random, &utxos, &[951], 50);
    unbalanced.body.kernels()[0].verify_signature(adapter.as_ref()).unwrap();
    assert_eq!(
        unbalanced.validate_internal_consistency(None, adapter.as_ref()),
        Err(TransactionError::ValidationUnbalanced)
    );
}

#[test]
fn the_kernel_commits_to_the_fee() {
    let adapter = adapter();
    let utxos = create_utxos(adapter.clone(), 1, 100);
    let (mut tx, _) = spend(adapter.clone(), KernelOffsetPolicy::Random, &utxos, &[90], 10);
    let (inputs, outputs, mut kernels) = tx.body.dissolve();
    kernels[0].fee = MicroMinotari(9);
    tx = Transaction::new(inputs, outputs, kernels, tx.offset, tx.script_offset);
    assert!(matches!(
        tx.validate_internal_consistency(None, adapter.as_ref()),
        Err(TransactionError::InvalidSignatureError(_))
    ));
}

#[test]
fn a_coinbase_output_can_be_spent_after_it_is_mined() {
    let adapter = adapter();
    let spend_key = adapter.random_secret_key();
    let (coinbase, spendable) = CoinbaseBuilder::new(adapter.clone(), TransactionEngineConfig::default())
        .with_lock_height(100)
        .with_fees(MicroMinotari(50))
        .with_spend_key(spend_key)
        .build_with_reward(MicroMinotari(1000))
        .unwrap();
    coinbase
        .validate_internal_consistency(Some(MicroMinotari(1050)), adapter.as_ref())
        .unwrap();

    let output = &coinbase.body.outputs()[0];
    assert_eq!(output.features.maturity, 100);
    assert_eq!(output.features.output_type, OutputType::Coinbase);
    assert_eq!(coinbase.body.kernels()[0].features, KernelFeatures::COINBASE_KERNEL);
    assert_eq!(get_transaction_output_hash(output), output.hash());

    let (tx, _) = spend(adapter.clone(), KernelOffsetPolicy::Random, &[spendable], &[1040], 10);
    assert_eq!(tx.body.inputs()[0].output_hash(), output.hash());
    tx.validate_internal_consistency(None, adapter.as_ref()).unwrap();
}

#[test]
fn a_fixed_nonce_reproduces_the_coinbase_kernel() {
    let config = TransactionEngineConfig::default();
    let build = |seed| {
        let adapter = Arc::new(RistrettoAdapter::seeded(&config, seed).unwrap());
        let key = adapter.random_secret_key();
        let nonce = adapter.random_secret_key();
        CoinbaseBuilder::new(adapter, config.clone())
            .with_lock_height(5)
            .with_fees(MicroMinotari(3))
            .with_spend_key(key)
            .with_nonce(nonce)
            .build_with_reward(MicroMinotari(100))
            .unwrap()
            .0
    };
    let a = build(42);
    let b = build(42);
    assert_eq!(a.body.kernels(), b.body.kernels());
    assert_eq!(a.body.outputs()[0].hash(), b.body.outputs()[0].hash());
    assert_ne!(build(43).body.kernels(), a.body.kernels());
}

#[test]
fn transactions_serialize_scalars_as_hex() {
    let adapter = adapter();
    let utxos = create_utxos(adapter.clone(), 1, 10);
    let (tx, _) = spend(adapter, KernelOffsetPolicy::Random, &utxos, &[10], 0);
    let json = serde_json::to_value(&tx).unwrap();
    assert_eq!(json["offset"].as_str().map(str::len), Some(64));
    assert_eq!(json["script_offset"].as_str().map(str::len), Some(64));
    assert_eq!(json["body"]["outputs"].as_array().map(Vec::len), Some(1));
    let decoded: Transaction = serde_json::from_value(json).unwrap();
    assert_eq!(decoded.body.outputs(), tx.body.outputs());
}

#[test]
fn a_received_maturity_wider_than_a_byte_is_rejected() {
    let adapter = adapter();
    let utxos = create_utxos(adapter.clone(), 1, 100);
    let (tx, _) = spend(adapter.clone(), KernelOffsetPolicy::Random, &utxos, &[90], 10);

    let mut json = serde_json::to_value(&tx).unwrap();
    json["body"]["outputs"][0]["features"]["maturity"] = 300.into();
    let received: Transaction = serde_json::from_value(json).unwrap();
    let expected = TransactionError::MaturityOutOfRange {
        maturity: 300,
        max: 255,
    };
    assert_eq!(
        received.validate_internal_consistency(None, adapter.as_ref()),
        Err(expected.clone())
    );
    assert_eq!(
        received.body.outputs()[0].verify_metadata_signature(adapter.as_ref()),
        Err(expected.clone())
    );

    let mut json = serde_json::to_value(&tx).unwrap();
    json["body"]["inputs"][0]["features"]["maturity"] = 300.into();
    let received: Transaction = serde_json::from_value(json).unwrap();
    assert_eq!(
        received.validate_internal_consistency(None, adapter.as_ref()),
        Err(expected.clone())
    );
    assert_eq!(
        received.body.inputs()[0].run_and_verify_script(adapter.as_ref()),
        Err(expected)
    );
}
