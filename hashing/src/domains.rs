// Copyright 2024 The Tari Project
// SPDX-License-Identifier: BSD-3-Clause

use tari_crypto::hash_domain;

// Hash domain for all transaction-related hashes, including the script signature challenge, metadata signature
// challenge, kernel signature challenge and the output hash
hash_domain!(TransactionHashDomain, "com.tari.base_layer.core.transactions", 0);

// Hash domain used to derive the AEAD key for the encrypted value carried by every output
hash_domain!(
    WalletOutputEncryptionKeysDomain,
    "com.tari.base_layer.wallet.output_encryption_keys",
    1
);

// Hash domain used to derive deterministic coinbase keys from the miner's spend key
hash_domain!(CoinbaseKeysDomain, "com.tari.base_layer.core.transactions.coinbase_keys", 0);
