use approx::assert_relative_eq;
use pretty_assertions::assert_eq;
use solar_tradeoff::output::FileOutput;
use solar_tradeoff::provider::PvgisFileProvider;
use solar_tradeoff::run_project;
use std::fmt::Write as _;
use std::fs;
use std::path::PathBuf;

const CONFIG: &str = r#"{
    "latitude": 45.0,
    "longitude": 8.0,
    "panel_angle": 35.0,
    "panel_azimuth": 180.0,
    "pv_tech": "crystSi",
    "horizon_data": [0.0, 5.0, 10.0, 5.0],
    "system_losses": 0.14,
    "inverter_efficiency": 1.0,
    "max_inverter_power": 800.0,
    "panel_price": [1200.0, 3000.0],
    "energy_cost_per_kwh": 0.2,
    "installation_costs": 300.0,
    "subsidy_amount": 500.0,
    "panel_sizes": [1000.0, 3000.0],
    "unused_energy": 0.0
}"#;

/// Two days of PVGIS CSV export with 0.3 W/W from 10:10 to 13:10 and a closing sample at the
/// start of the third day.
fn pvgis_csv() -> String {
    let mut csv = String::from(
        "Latitude (decimal degrees):\t45.000\n\
         Longitude (decimal degrees):\t8.000\n\
         Radiation database:\tPVGIS-SARAH2\n\n\
         time,P,G(i),H_sun,T2m,WS10m,Int\n",
    );
    for h in 0..=48 {
        let day = 1 + h / 24;
        let hour = h % 24;
        let power = if (10..14).contains(&hour) && h < 48 {
            0.3
        } else {
            0.
        };
        writeln!(csv, "201606{day:02}:{hour:02}10,{power},0.0,0.0,18.0,1.0,0.0").unwrap();
    }
    csv.push_str("\nP: PV system power (W)\n");
    csv
}

struct TempDir(PathBuf);

impl TempDir {
    fn new(name: &str) -> Self {
        let path = std::env::temp_dir().join(format!("{name}_{}", std::process::id()));
        fs::create_dir_all(&path).unwrap();
        Self(path)
    }
}

impl Drop for TempDir {
    fn drop(&mut self) {
        let _ = fs::remove_dir_all(&self.0);
    }
}

#[test]
fn test_run_project_from_files() {
    let directory = TempDir::new("solar_tradeoff_end_to_end");
    let series_path = directory.0.join("pvgis.csv");
    fs::write(&series_path, pvgis_csv()).unwrap();

    let output = FileOutput::new(directory.0.clone(), "site__{}.csv".to_string());
    let results = run_project(
        CONFIG.as_bytes(),
        &PvgisFileProvider::new(&series_path),
        &output,
    )
    .unwrap();

    assert_relative_eq!(results.observation_years(), 2. / 365.);

    let small = results.get(0).unwrap();
    assert_relative_eq!(small.initial_cost, 1500.);
    assert_relative_eq!(small.annual_energy_generated, 438., max_relative = 1e-9);
    assert_relative_eq!(
        small.payback_time.as_years(),
        1000. / 87.6,
        max_relative = 1e-9
    );
    assert_eq!(small.balance_trajectory[0], -1000.);

    // 3000 W * 0.3 is clipped to the 800 W inverter cap
    let large = results.get(1).unwrap();
    assert_relative_eq!(large.initial_cost, 3300.);
    assert_relative_eq!(large.annual_energy_generated, 1168., max_relative = 1e-9);
    assert_relative_eq!(
        large.payback_time.as_years(),
        2800. / 233.6,
        max_relative = 1e-9
    );
    assert_relative_eq!(
        *large.balance_trajectory.last().unwrap(),
        -2800. + 6.4 * 0.2,
        max_relative = 1e-9
    );

    let summary = fs::read_to_string(directory.0.join("site__summary.csv")).unwrap();
    assert_eq!(
        summary.lines().take(2).collect::<Vec<_>>(),
        vec![
            "Panel size,Initial cost,Energy generated,Payback time",
            "[W],[currency],[kWh/year],[years]"
        ]
    );
    assert_eq!(summary.lines().count(), 4);

    let balance = fs::read_to_string(directory.0.join("site__balance.csv")).unwrap();
    assert_eq!(balance.lines().count(), 2 + 49);

    let profile = fs::read_to_string(directory.0.join("site__generation_profile.csv")).unwrap();
    assert_eq!(profile.lines().next(), Some("Hour of the day,Summer"));
    assert_eq!(profile.lines().count(), 2 + 24);
}

#[test]
fn test_run_project_fails_on_unreadable_series() {
    let directory = TempDir::new("solar_tradeoff_end_to_end_bad_series");
    let series_path = directory.0.join("pvgis.csv");
    fs::write(&series_path, "no data in here\n").unwrap();

    let output = FileOutput::new(directory.0.clone(), "site__{}.csv".to_string());
    let result = run_project(
        CONFIG.as_bytes(),
        &PvgisFileProvider::new(&series_path),
        &output,
    );

    assert!(result.is_err());
    assert!(!directory.0.join("site__summary.csv").exists());
}
