use serde::{Deserialize, Serialize};

/// Event generator family driving the run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SimEngine {
    EvtCalc,
    Pythia6,
    #[default]
    Pythia8,
    #[serde(rename = "PG")]
    ParticleGun,
    Genie,
    #[serde(rename = "nuRadiography")]
    NuRadiography,
    Ntuple,
    MuonBack,
    Nuage,
    #[serde(rename = "muonDIS")]
    MuonDis,
    Cosmics,
}

impl SimEngine {
    /// Name used in logs and in the output tag.
    pub fn name(self) -> &'static str {
        match self {
            SimEngine::EvtCalc => "EvtCalc",
            SimEngine::Pythia6 => "Pythia6",
            SimEngine::Pythia8 => "Pythia8",
            SimEngine::ParticleGun => "PG",
            SimEngine::Genie => "Genie",
            SimEngine::NuRadiography => "nuRadiography",
            SimEngine::Ntuple => "Ntuple",
            SimEngine::MuonBack => "MuonBack",
            SimEngine::Nuage => "Nuage",
            SimEngine::MuonDis => "muonDIS",
            SimEngine::Cosmics => "Cosmics",
        }
    }

    /// Engines that refuse to run on the default input sample.
    pub fn requires_explicit_input(self) -> bool {
        matches!(
            self,
            SimEngine::Ntuple | SimEngine::MuonBack | SimEngine::MuonDis
        )
    }
}

impl std::fmt::Display for SimEngine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// Generator-kind switches as given on the command line.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct EngineFlags {
    pub evtcalc: bool,
    pub pythia6: bool,
    pub pythia8: bool,
    pub particle_gun: bool,
    pub genie: bool,
    pub nu_radiography: bool,
    pub ntuple: bool,
    pub muon_back: bool,
    pub nuage: bool,
    pub muon_dis: bool,
    pub cosmics: bool,
}

impl EngineFlags {
    /// Flags in evaluation order. Every set flag overwrites the previous choice, so the
    /// last set flag in this order decides the engine.
    pub fn ordered(&self) -> [(bool, SimEngine); 11] {
        [
            (self.evtcalc, SimEngine::EvtCalc),
            (self.pythia6, SimEngine::Pythia6),
            (self.pythia8, SimEngine::Pythia8),
            (self.particle_gun, SimEngine::ParticleGun),
            (self.genie, SimEngine::Genie),
            (self.nu_radiography, SimEngine::NuRadiography),
            (self.ntuple, SimEngine::Ntuple),
            (self.muon_back, SimEngine::MuonBack),
            (self.nuage, SimEngine::Nuage),
            (self.muon_dis, SimEngine::MuonDis),
            (self.cosmics, SimEngine::Cosmics),
        ]
    }

    /// Resolves the engine, defaulting to Pythia8 when no flag is set.
    pub fn resolve(&self) -> SimEngine {
        self.ordered()
            .into_iter()
            .filter(|(set, _)| *set)
            .map(|(_, engine)| engine)
            .last()
            .unwrap_or_default()
    }

    /// Number of generator-kind flags that were set.
    pub fn count(&self) -> usize {
        self.ordered().iter().filter(|(set, _)| *set).count()
    }
}
