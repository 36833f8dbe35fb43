use super::*;
use crate::{Provider, Rule, SemanticError};
use ingress_claim_k8s_api::annotations::{ALIASES, DEFAULT_DOMAIN, INGRESS_CLASS, PORTS};
use rstest::rstest;

#[test]
fn names() {
    assert_eq!(Provider::Ats.name(), "ATS");
    assert_eq!(Provider::Istio.name(), "istio");
    assert_eq!(Provider::DEFAULT, Provider::Ats);
    assert!(Provider::Ats.is_default());
    assert!(!Provider::Istio.is_default());
}

#[test]
fn parses_names() {
    assert_eq!("ATS".parse::<Provider>().unwrap(), Provider::Ats);
    assert_eq!(" ats ".parse::<Provider>().unwrap(), Provider::Ats);
    assert_eq!("istio".parse::<Provider>().unwrap(), Provider::Istio);
    assert_eq!("Istio".parse::<Provider>().unwrap(), Provider::Istio);
    assert!("nginx".parse::<Provider>().is_err());
}

#[rstest]
#[case::no_class(None, true, false)]
#[case::ats_class(Some("ATS"), true, false)]
#[case::istio_class(Some("istio"), false, true)]
#[case::other_class(Some("other"), false, false)]
#[case::lowercase_ats(Some("ats"), false, false)]
fn serves_ingress(#[case] class: Option<&'static str>, #[case] ats: bool, #[case] istio: bool) {
    let ingress = mk_ingress("ns-0", "ing-0", class.map(|c| (INGRESS_CLASS, c)));
    assert_eq!(Provider::Ats.serves_ingress(&ingress), ats);
    assert_eq!(Provider::Istio.serves_ingress(&ingress), istio);
}

#[rstest]
fn ownership_is_exclusive(
    #[values(None, Some("ATS"), Some("istio"), Some("nginx"), Some(""))] class: Option<
        &'static str,
    >,
) {
    let ingress = mk_ingress("ns-0", "ing-0", class.map(|c| (INGRESS_CLASS, c)));
    let owners = [Provider::Ats, Provider::Istio]
        .into_iter()
        .filter(|p| p.serves_ingress(&ingress))
        .count();
    assert!(owners <= 1, "{class:?} is served by {owners} providers");
}

#[test]
fn ats_domains() {
    // An ingress with a default domain and aliases.
    let ingress = mk_ingress(
        "ns-0",
        "ing-0",
        [
            (DEFAULT_DOMAIN, "app.test.com"),
            (ALIASES, "a.test.com, b.test.com"),
            (PORTS, "80"),
        ],
    );
    assert_eq!(
        Provider::Ats.domains(&ingress),
        vec!["app.test.com", "a.test.com", "b.test.com"]
    );

    // Only a default domain.
    let ingress = mk_ingress("ns-0", "ing-0", [(DEFAULT_DOMAIN, "test1.company.com")]);
    assert_eq!(Provider::Ats.domains(&ingress), vec!["test1.company.com"]);

    // Nothing declared.
    let ingress = mk_ingress("ns-0", "ing-0", []);
    assert!(Provider::Ats.domains(&ingress).is_empty());
}

#[test]
fn ats_domains_are_sanitized_and_deduplicated() {
    let ingress = mk_ingress(
        "ns-0",
        "ing-0",
        [
            (DEFAULT_DOMAIN, " App.Test.COM "),
            (ALIASES, "a.test.com,,APP.test.com, A.Test.com ,b.test.com"),
        ],
    );
    assert_eq!(
        Provider::Ats.domains(&ingress),
        vec!["app.test.com", "a.test.com", "b.test.com"]
    );
}

#[test]
fn ats_ignores_rule_hosts() {
    let ingress = with_rules(
        mk_ingress("ns-0", "ing-0", [(DEFAULT_DOMAIN, "app.test.com")]),
        [Some("other.test.com")],
    );
    assert_eq!(Provider::Ats.domains(&ingress), vec!["app.test.com"]);
}

#[test]
fn ats_validates_scenario() {
    let ingress = with_default_backend(mk_ingress(
        "ns-0",
        "ing-0",
        [
            (DEFAULT_DOMAIN, "app.test.com"),
            (ALIASES, "a.test.com, b.test.com"),
            (PORTS, "80"),
        ],
    ));
    assert_eq!(Provider::Ats.validate_semantics(&ingress), Ok(()));
}

#[rstest]
#[case::no_backend(false, Some("80"), Some("a.com"), Rule::MissingDefaultBackend)]
#[case::no_backend_or_ports(false, None, None, Rule::MissingDefaultBackend)]
#[case::no_ports(true, None, Some("a.com"), Rule::MissingPorts)]
#[case::blank_ports(true, Some(" , "), Some("a.com"), Rule::MissingPorts)]
#[case::no_default_domain(true, Some("80"), None, Rule::MissingDefaultDomain)]
#[case::blank_default_domain(true, Some("80,443"), Some("   "), Rule::MissingDefaultDomain)]
fn ats_rejects(
    #[case] backend: bool,
    #[case] ports: Option<&'static str>,
    #[case] default_domain: Option<&'static str>,
    #[case] rule: Rule,
) {
    let annotations = ports
        .map(|p| (PORTS, p))
        .into_iter()
        .chain(default_domain.map(|d| (DEFAULT_DOMAIN, d)));
    let mut ingress = mk_ingress("test-ns2", "test-ingress2", annotations);
    if backend {
        ingress = with_default_backend(ingress);
    }
    assert_eq!(
        Provider::Ats.validate_semantics(&ingress),
        Err(SemanticError {
            namespace: "test-ns2".to_string(),
            name: "test-ingress2".to_string(),
            rule,
        })
    );
}

#[test]
fn ats_error_messages() {
    let ingress = mk_ingress("test-ns2", "test-ingress2", [(PORTS, "80")]);
    let error = Provider::Ats.validate_semantics(&ingress).unwrap_err();
    assert_eq!(
        error.to_string(),
        "Ingress test-ingress2 in namespace test-ns2 does not have a default backend specified."
    );

    let ingress = with_default_backend(mk_ingress("test-ns2", "test-ingress2", [(PORTS, "80")]));
    let error = Provider::Ats.validate_semantics(&ingress).unwrap_err();
    assert_eq!(
        error.to_string(),
        "Ingress test-ingress2 in namespace test-ns2 does not have a default_domain annotation \
         specified."
    );
}

#[test]
fn ats_skips_validation_of_other_classes() {
    let ingress = mk_ingress("ns-0", "ing-0", [(INGRESS_CLASS, "istio")]);
    assert_eq!(Provider::Ats.validate_semantics(&ingress), Ok(()));
    assert!(Provider::Ats.domains(&ingress).is_empty());
}

#[test]
fn istio_domains() {
    let ingress = with_rules(
        mk_ingress("ns-0", "ing-0", [(INGRESS_CLASS, "istio")]),
        [Some("x.com"), None, Some("y.com")],
    );
    assert_eq!(Provider::Istio.domains(&ingress), vec!["x.com", "y.com"]);

    let ingress = mk_ingress("ns-0", "ing-0", [(INGRESS_CLASS, "istio")]);
    assert!(Provider::Istio.domains(&ingress).is_empty());
}

#[test]
fn istio_domains_are_sanitized_and_deduplicated() {
    let ingress = with_rules(
        mk_ingress("ns-0", "ing-0", [(INGRESS_CLASS, "istio")]),
        [Some(" X.com"), Some("x.COM "), Some(""), Some("y.com")],
    );
    assert_eq!(Provider::Istio.domains(&ingress), vec!["x.com", "y.com"]);
}

#[test]
fn istio_ignores_unowned_ingresses() {
    let ingress = with_rules(mk_ingress("ns-0", "ing-0", []), [Some("x.com")]);
    assert!(Provider::Istio.domains(&ingress).is_empty());
    assert_eq!(Provider::Istio.validate_semantics(&ingress), Ok(()));
}

#[test]
fn istio_validates() {
    let ingress = with_rules(
        mk_ingress("ns-0", "ing-0", [(INGRESS_CLASS, "istio")]),
        [Some("x.com"), Some("y.com")],
    );
    assert_eq!(Provider::Istio.validate_semantics(&ingress), Ok(()));

    // An ingress with no rules at all has nothing to reject.
    let ingress = mk_ingress("ns-0", "ing-0", [(INGRESS_CLASS, "istio")]);
    assert_eq!(Provider::Istio.validate_semantics(&ingress), Ok(()));
}

#[test]
fn istio_rejects_default_backend() {
    let ingress = with_default_backend(with_rules(
        mk_ingress("test-ns", "test-ingress", [(INGRESS_CLASS, "istio")]),
        [None],
    ));
    let error = Provider::Istio.validate_semantics(&ingress).unwrap_err();
    assert_eq!(error.rule, Rule::DefaultBackendUnsupported("istio"));
    assert_eq!(
        error.to_string(),
        "Ingress test-ingress in namespace test-ns specifies a default backend which is currently \
         NOT supported for provider class: istio"
    );
}

#[rstest]
#[case::missing_host(None)]
#[case::blank_host(Some("  "))]
fn istio_rejects_hostless_rules(#[case] host: Option<&'static str>) {
    let ingress = with_rules(
        mk_ingress("test-ns", "test-ingress", [(INGRESS_CLASS, "istio")]),
        [Some("x.com"), host, Some("y.com")],
    );
    let error = Provider::Istio.validate_semantics(&ingress).unwrap_err();
    assert_eq!(error.rule, Rule::RuleWithoutHost("istio"));
    assert_eq!(
        error.to_string(),
        "Ingress test-ingress in namespace test-ns specifies an IngressRule without a Host which is \
         currently NOT supported for provider class: istio"
    );
}

#[test]
fn claim_domains_probes_any_ingress() {
    let ingress = with_rules(
        mk_ingress("ns-0", "ing-0", [(INGRESS_CLASS, "istio")]),
        [Some("x.com")],
    );
    let ats = Provider::Ats.claim_domains(&ingress);
    assert_eq!(ats.provider, "ATS");
    assert!(ats.domains.is_empty());

    let istio = Provider::Istio.claim_domains(&ingress);
    assert_eq!(istio.provider, "istio");
    assert_eq!(istio.domains, vec!["x.com"]);
}
