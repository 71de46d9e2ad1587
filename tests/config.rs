use quic_pacing::{
    config::parse_config,
    time::Delta,
    units::{Bytes, Microsecs, Nanosecs},
    CongestionControlType, Config, PacingConfig, TransportConfig,
};

#[test]
fn full_config_round_trips_through_json() -> anyhow::Result<()> {
    let json = r#"{
        "pacing": { "alarm_granularity": 250, "initial_packet_burst": 4 },
        "transport": {
            "congestion_control": "Reno",
            "initial_rtt": 100000000,
            "max_initial_window": 14600
        }
    }"#;
    let cfg = parse_config(json)?;
    let expected = Config::builder()
        .pacing(
            PacingConfig::builder()
                .alarm_granularity(Microsecs::new(250))
                .initial_packet_burst(4)
                .build(),
        )
        .transport(
            TransportConfig::builder()
                .congestion_control(CongestionControlType::Reno)
                .initial_rtt(Nanosecs::new(100_000_000))
                .max_initial_window(Bytes::new(14_600))
                .build(),
        )
        .build();
    assert_eq!(cfg, expected);
    assert_eq!(cfg.pacing.alarm_granularity(), Delta::new(250_000));
    Ok(())
}

#[test]
fn empty_config_uses_defaults() -> anyhow::Result<()> {
    let cfg = parse_config("{}")?;
    assert_eq!(cfg, Config::default());
    assert_eq!(cfg.pacing.initial_packet_burst, 10);
    assert_eq!(cfg.transport.congestion_control, CongestionControlType::Cubic);
    Ok(())
}
