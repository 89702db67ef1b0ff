// common/tests/auth_flow.rs
use common::{
    validate_token, AuthErrorKind, AuthRequest, AuthResult, KeypairWallet, TokenIssuer,
    TokenOptions, TokenValidator, WalletAuthClient, WalletProvider, WalletRegistry,
};

const SECRET: &[u8] = b"integration-secret-0123456789abcdef";

#[tokio::test]
async fn test_wallet_sign_in_to_validated_session() {
    let mut registry = WalletRegistry::new()
        .with_wallet(Box::new(KeypairWallet::generate(WalletProvider::Phantom)));

    let mut client = WalletAuthClient::detect(&mut registry, None).unwrap();
    let public_key = client.connect().await.unwrap();
    let result = client.sign_in(None).await.unwrap();

    // Server side: the request body is all it sees
    let body = serde_json::to_string(&AuthRequest::from(&result)).unwrap();
    let received: AuthResult = serde_json::from_str::<AuthRequest>(&body).unwrap().into();

    let options = TokenOptions::default()
        .with_issuer("wallet-auth")
        .with_audience("app-a");
    let token = TokenIssuer::default().issue(&received, SECRET, &options).unwrap();
    let result = result.with_token(token.clone());
    assert_eq!(result.token.as_deref(), Some(token.as_str()));

    let claims = TokenValidator::default()
        .validate(&token, SECRET, Some(&options))
        .unwrap();
    assert_eq!(claims.public_key, public_key);
    assert_eq!(claims.timestamp, result.timestamp);
}

#[tokio::test]
async fn test_replayed_signature_with_other_message_is_refused() {
    let mut client =
        WalletAuthClient::new(Box::new(KeypairWallet::generate(WalletProvider::Solflare)));
    client.connect().await.unwrap();
    let mut result = client.sign_in(Some("hello".to_string())).await.unwrap();

    result.message = "hello, again".to_string();
    let err = TokenIssuer::default()
        .issue(&result, SECRET, &TokenOptions::default())
        .unwrap_err();
    assert_eq!(err.kind(), AuthErrorKind::SignatureInvalid);
}

#[tokio::test]
async fn test_signature_from_other_wallet_is_refused() {
    let mut alice = WalletAuthClient::new(Box::new(KeypairWallet::generate(WalletProvider::Glow)));
    let mut mallory =
        WalletAuthClient::new(Box::new(KeypairWallet::generate(WalletProvider::Glow)));
    let alice_key = alice.connect().await.unwrap();
    mallory.connect().await.unwrap();

    let mut forged = mallory.sign_in(None).await.unwrap();
    forged.public_key = alice_key;
    let err = TokenIssuer::default()
        .issue(&forged, SECRET, &TokenOptions::default())
        .unwrap_err();
    assert_eq!(err.kind(), AuthErrorKind::SignatureInvalid);
}

#[tokio::test]
async fn test_token_for_other_audience_is_rejected() {
    let mut client =
        WalletAuthClient::new(Box::new(KeypairWallet::generate(WalletProvider::Backpack)));
    client.connect().await.unwrap();
    let result = client.sign_in(None).await.unwrap();

    let token = TokenIssuer::default()
        .issue(&result, SECRET, &TokenOptions::default().with_audience("app-a"))
        .unwrap();
    let err = validate_token(&token, SECRET, Some(&TokenOptions::default().with_audience("app-b")))
        .unwrap_err();
    assert_eq!(err.kind(), AuthErrorKind::TokenInvalid);
}
