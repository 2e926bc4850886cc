//! Integration tests for capability attenuation over resolved chains.

mod common;

use common::{
    EmailCapability, EmailSemantics, EqualitySemantics, NOW, alice, bob, draft, email_capability,
    mallory, validator,
};
use pretty_assertions::assert_eq;
use testresult::TestResult;
use ucan_chain::{
    Capability, CapabilityInfo, CapabilitySemantics, CapabilityWithInfo, Chained, Expiration,
    Timestamp, Token, attenuate, has_capability,
};
use ucan_did::Did;

fn email(address: &str) -> EmailCapability {
    EmailCapability {
        email: address.to_string(),
    }
}

fn info(
    originator: Did,
    not_before: Option<Timestamp>,
    expires_at: Expiration,
) -> CapabilityInfo {
    CapabilityInfo {
        originator,
        not_before,
        expires_at,
    }
}

async fn resolve(token: &Token) -> Chained {
    validator()
        .resolve(&token.encode())
        .await
        .expect("chain should resolve")
}

#[tokio::test]
async fn it_works_with_a_simple_example() {
    // alice -> bob, bob -> mallory
    // alice delegates access to sending email as her to bob
    // and bob delegates it further to mallory
    let leaf = draft(&alice(), &bob())
        .capability(email_capability("alice@email.com"))
        .not_before(NOW - 100)
        .expires_at(NOW + 500)
        .sign();
    let root = draft(&bob(), &mallory())
        .capability(email_capability("alice@email.com"))
        .not_before(NOW - 50)
        .expires_at(NOW + 1_000)
        .proof(&leaf)
        .sign();

    let chain = resolve(&root).await;

    assert_eq!(
        attenuate(&EmailSemantics, &chain),
        vec![CapabilityWithInfo {
            capability: email("alice@email.com"),
            info: info(
                alice().did(),
                Some(Timestamp::from_unix(NOW - 50)),
                Timestamp::from_unix(NOW + 500).into(),
            ),
        }]
    );
}

#[tokio::test]
async fn it_reports_the_first_issuer_in_the_chain_as_originator() {
    // alice -> bob, bob -> mallory
    // alice delegates nothing to bob
    // and bob delegates his own email to mallory
    let leaf = draft(&alice(), &bob()).sign();
    let root = draft(&bob(), &mallory())
        .capability(email_capability("bob@email.com"))
        .proof(&leaf)
        .sign();

    let chain = resolve(&root).await;

    assert_eq!(
        chain.attenuate(&EmailSemantics),
        vec![CapabilityWithInfo {
            capability: email("bob@email.com"),
            info: CapabilityInfo::issued_by(&root),
        }]
    );
}

#[tokio::test]
async fn it_self_certifies_capabilities_of_a_token_without_proofs() {
    let token = draft(&alice(), &bob())
        .capability(email_capability("alice@email.com"))
        .never_expires()
        .sign();

    let results = attenuate(&EmailSemantics, &resolve(&token).await);
    assert_eq!(
        results,
        vec![CapabilityWithInfo {
            capability: email("alice@email.com"),
            info: info(alice().did(), None, Expiration::Never),
        }]
    );
}

#[tokio::test]
async fn it_finds_the_right_proof_chain_for_the_originator() {
    // alice -> mallory, bob -> mallory, mallory -> alice
    // both alice and bob delegate their email access to mallory
    // mallory then creates a token with capability to send both
    let from_alice = draft(&alice(), &mallory())
        .capability(email_capability("alice@email.com"))
        .expires_at(NOW + 100)
        .sign();
    let from_bob = draft(&bob(), &mallory())
        .capability(email_capability("bob@email.com"))
        .expires_at(NOW + 200)
        .sign();
    let root = draft(&mallory(), &alice())
        .capability(email_capability("alice@email.com"))
        .capability(email_capability("bob@email.com"))
        .proof(&from_alice)
        .proof(&from_bob)
        .sign();

    let chain = resolve(&root).await;

    assert_eq!(
        attenuate(&EmailSemantics, &chain),
        vec![
            CapabilityWithInfo {
                capability: email("alice@email.com"),
                info: info(alice().did(), None, Timestamp::from_unix(NOW + 100).into()),
            },
            CapabilityWithInfo {
                capability: email("bob@email.com"),
                info: info(bob().did(), None, Timestamp::from_unix(NOW + 200).into()),
            },
        ]
    );
}

#[tokio::test]
async fn it_reports_all_chain_options() {
    // alice -> mallory, bob -> mallory, mallory -> alice
    // both alice and bob claim to have access to alice@email.com
    // and both grant that capability to mallory
    // a verifier needs to know both to verify valid email access
    let from_alice = draft(&alice(), &mallory())
        .capability(email_capability("alice@email.com"))
        .sign();
    let from_bob = draft(&bob(), &mallory())
        .capability(email_capability("alice@email.com"))
        .sign();
    let root = draft(&mallory(), &alice())
        .capability(email_capability("alice@email.com"))
        .proof(&from_alice)
        .proof(&from_bob)
        .sign();

    let chain = resolve(&root).await;
    let expires_at = root.expiration();

    assert_eq!(
        attenuate(&EmailSemantics, &chain),
        vec![
            CapabilityWithInfo {
                capability: email("alice@email.com"),
                info: info(alice().did(), None, expires_at),
            },
            CapabilityWithInfo {
                capability: email("alice@email.com"),
                info: info(bob().did(), None, expires_at),
            },
        ]
    );
}

#[tokio::test]
async fn it_propagates_the_originator_through_several_hops() {
    // alice -> bob -> mallory -> alice
    let first = draft(&alice(), &bob())
        .capability(email_capability("alice@email.com"))
        .sign();
    let second = draft(&bob(), &mallory())
        .capability(email_capability("alice@email.com"))
        .proof(&first)
        .expires_at(NOW + 10)
        .sign();
    let third = draft(&mallory(), &alice())
        .capability(email_capability("alice@email.com"))
        .proof(&second)
        .sign();

    let results = attenuate(&EmailSemantics, &resolve(&third).await);
    assert_eq!(results.len(), 1);
    assert_eq!(results[0].info.originator, alice().did());
    assert_eq!(
        results[0].info.expires_at,
        Timestamp::from_unix(NOW + 10).into()
    );
}

#[tokio::test]
async fn it_skips_records_outside_the_vocabulary() {
    let token = draft(&alice(), &bob())
        .capability(
            Capability::new()
                .with("wnfs", "alice/public")
                .with("cap", "OVERWRITE"),
        )
        .capability(email_capability("alice@email.com"))
        .sign();

    let results = attenuate(&EmailSemantics, &resolve(&token).await);
    assert_eq!(
        results
            .into_iter()
            .map(|result| result.capability)
            .collect::<Vec<_>>(),
        vec![email("alice@email.com")]
    );
}

#[tokio::test]
async fn it_is_restartable() {
    let leaf = draft(&alice(), &bob())
        .capability(email_capability("alice@email.com"))
        .sign();
    let root = draft(&bob(), &mallory())
        .capability(email_capability("alice@email.com"))
        .proof(&leaf)
        .sign();
    let chain = resolve(&root).await;

    assert_eq!(
        attenuate(&EmailSemantics, &chain),
        attenuate(&EmailSemantics, &chain)
    );
}

/// Capabilities on path prefixes: a holder of `/a/` may grant `/a/b`.
struct PathSemantics;

impl CapabilitySemantics<String> for PathSemantics {
    fn try_parse(&self, capability: &Capability) -> Option<String> {
        capability.get_str("path").map(str::to_string)
    }

    fn try_delegate(&self, parent: &String, child: &String) -> Option<String> {
        child.starts_with(parent.as_str()).then(|| child.clone())
    }
}

#[tokio::test]
async fn it_narrows_and_refuses_escalation() {
    let leaf = draft(&alice(), &bob())
        .capability(Capability::new().with("path", "/photos/"))
        .sign();
    let root = draft(&bob(), &mallory())
        .capability(Capability::new().with("path", "/photos/2024/"))
        .capability(Capability::new().with("path", "/"))
        .proof(&leaf)
        .sign();

    let results = attenuate(&PathSemantics, &resolve(&root).await);
    let summary: Vec<_> = results
        .iter()
        .map(|result| (result.capability.as_str(), result.info.originator.clone()))
        .collect();

    // The broader "/" is not covered by the proof, so it can only be bob's own.
    assert_eq!(
        summary,
        vec![("/photos/2024/", alice().did()), ("/", bob().did())]
    );
}

async fn alice_email_delegation_example() -> Chained {
    // alice -> bob, bob -> mallory
    let leaf = draft(&alice(), &bob())
        .capability(email_capability("alice@email.com"))
        .sign();
    let root = draft(&bob(), &mallory())
        .capability(email_capability("alice@email.com"))
        .proof(&leaf)
        .sign();
    resolve(&root).await
}

fn claim(
    capability: Capability,
    originator: Did,
    from: u64,
    to: u64,
) -> CapabilityWithInfo<Capability> {
    CapabilityWithInfo {
        capability,
        info: info(
            originator,
            Some(Timestamp::from_unix(from)),
            Timestamp::from_unix(to).into(),
        ),
    }
}

#[tokio::test]
async fn it_gets_a_capability() -> TestResult {
    let chain = alice_email_delegation_example().await;
    let wanted = claim(email_capability("alice@email.com"), alice().did(), NOW, NOW);

    let held = has_capability(&EqualitySemantics, &wanted, &chain).ok_or("capability not found")?;

    assert_eq!(held.info.originator, alice().did());
    assert_eq!(held.capability.get_str("email"), Some("alice@email.com"));
    Ok(())
}

#[tokio::test]
async fn it_rejects_an_invalid_escalation() {
    let chain = alice_email_delegation_example().await;
    let wanted = claim(
        email_capability("alice@email.com").with("cap", "SUPERUSER"),
        alice().did(),
        NOW,
        NOW,
    );

    assert_eq!(has_capability(&EqualitySemantics, &wanted, &chain), None);
}

#[tokio::test]
async fn it_rejects_an_invalid_originator() {
    let chain = alice_email_delegation_example().await;
    let wanted = claim(email_capability("alice@email.com"), bob().did(), NOW, NOW);

    assert_eq!(has_capability(&EqualitySemantics, &wanted, &chain), None);
}

#[tokio::test]
async fn it_rejects_an_interval_the_chain_does_not_cover() {
    let chain = alice_email_delegation_example().await;

    // Tokens are valid for an hour; asking for a day is too much.
    let too_long = claim(
        email_capability("alice@email.com"),
        alice().did(),
        NOW,
        NOW + 60 * 60 * 24,
    );
    assert_eq!(has_capability(&EqualitySemantics, &too_long, &chain), None);

    // Neither token has an nbf, so any start is covered.
    let early_start = claim(email_capability("alice@email.com"), alice().did(), 0, NOW);
    assert!(has_capability(&EqualitySemantics, &early_start, &chain).is_some());

    // But a claim that never expires is not.
    let forever = CapabilityWithInfo {
        capability: email_capability("alice@email.com"),
        info: info(alice().did(), None, Expiration::Never),
    };
    assert_eq!(has_capability(&EqualitySemantics, &forever, &chain), None);
}

#[tokio::test]
async fn it_picks_the_lineage_with_the_claimed_originator() -> TestResult {
    let from_alice = draft(&alice(), &mallory())
        .capability(email_capability("alice@email.com"))
        .sign();
    let from_bob = draft(&bob(), &mallory())
        .capability(email_capability("alice@email.com"))
        .sign();
    let root = draft(&mallory(), &alice())
        .capability(email_capability("alice@email.com"))
        .proof(&from_alice)
        .proof(&from_bob)
        .sign();
    let chain = resolve(&root).await;

    let wanted = claim(email_capability("alice@email.com"), bob().did(), NOW, NOW);
    let held = has_capability(&EqualitySemantics, &wanted, &chain).ok_or("no lineage from bob")?;

    assert_eq!(held.info.originator, bob().did());
    Ok(())
}
