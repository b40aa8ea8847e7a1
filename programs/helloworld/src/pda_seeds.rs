//! This file contains the PDA seeds for the HelloWorld program.

/// PDA seeds for a payer's greeting account.
#[macro_export]
macro_rules! greeting_pda_seeds {
    ($payer_pubkey:expr) => {{
        &[b"hello_world", b"-", b"greeting", b"-", $payer_pubkey.as_ref()]
    }};

    ($payer_pubkey:expr, $bump_seed:expr) => {{
        &[
            b"hello_world",
            b"-",
            b"greeting",
            b"-",
            $payer_pubkey.as_ref(),
            &[$bump_seed],
        ]
    }};
}
