use std::collections::HashMap;

use chess::Board;

use crate::motifs::forks::find_forks;
use crate::motifs::hanging::{find_hanging, find_trapped};
use crate::motifs::king::{
    find_back_rank_weaknesses, find_double_checks, find_exposed_kings, find_mate_threats,
};
use crate::motifs::mates::find_mate_patterns;
use crate::motifs::overload::{find_capturable_defenders, find_overloaded};
use crate::motifs::rays::classify_rays;
use crate::motifs::{
    Coord, Involvement, InvolvementRole, MotifChain, MotifId, MotifKind, TacticalMotifs,
};
use crate::valuation::valuate;

/// Feature switches passed explicitly into every analysis call; no ambient
/// global state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AnalysisConfig {
    /// Run the cross-referencing pass that links motifs sharing squares.
    pub enable_chaining: bool,
    /// Run the costlier detectors: trapped pieces, mate threats, overloads
    /// and capturable defenders.
    pub enable_tier2: bool,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            enable_chaining: true,
            enable_tier2: true,
        }
    }
}

/// Derives every tactical motif from one position snapshot. Deterministic
/// and side-effect free; the snapshot is never mutated.
pub fn analyze_tactics(board: &Board, config: &AnalysisConfig) -> TacticalMotifs {
    let rays = classify_rays(board);
    let mut motifs = TacticalMotifs {
        forks: find_forks(board, &rays.pins),
        pins: rays.pins,
        skewers: rays.skewers,
        xray_attacks: rays.xray_attacks,
        xray_defenses: rays.xray_defenses,
        discovered_attacks: rays.discovered_attacks,
        hanging: find_hanging(board),
        exposed_kings: find_exposed_kings(board),
        back_rank_weaknesses: find_back_rank_weaknesses(board),
        double_checks: find_double_checks(board),
        mate_patterns: find_mate_patterns(board),
        ..Default::default()
    };

    if config.enable_tier2 {
        motifs.trapped = find_trapped(board);
        motifs.mate_threats = find_mate_threats(board);
        motifs.overloaded = find_overloaded(board, &motifs.mate_threats);
        motifs.capturable_defenders = find_capturable_defenders(board);
    }

    valuate(board, &mut motifs);

    if config.enable_chaining {
        motifs.chains = detect_chains(&motifs);
    }

    log::debug!(
        "analyzed position: {} pins, {} forks, {} skewers, {} hanging, {} chains",
        motifs.pins.len(),
        motifs.forks.len(),
        motifs.skewers.len(),
        motifs.hanging.len(),
        motifs.chains.len()
    );

    motifs
}

/// Links motifs after the fact: when the acting piece of one motif stands on
/// a square another motif already compromises, the two form a chain. Pure
/// index joins; the core records stay untouched.
fn detect_chains(motifs: &TacticalMotifs) -> Vec<MotifChain> {
    let ids = motif_ids(motifs);
    let mut chains = Vec::new();

    for &base in &ids {
        let compromised = compromised_squares(motifs, base);
        if compromised.is_empty() {
            continue;
        }
        for &dependent in &ids {
            if dependent == base {
                continue;
            }
            for square in actor_squares(motifs, dependent) {
                if compromised.contains(&square) {
                    chains.push(MotifChain {
                        base,
                        dependent,
                        square,
                    });
                }
            }
        }
    }

    chains
}

fn motif_ids(motifs: &TacticalMotifs) -> Vec<MotifId> {
    let mut ids = Vec::new();
    let mut add = |kind: MotifKind, len: usize| {
        ids.extend((0..len).map(|index| MotifId { kind, index }));
    };
    add(MotifKind::Pin, motifs.pins.len());
    add(MotifKind::Fork, motifs.forks.len());
    add(MotifKind::Skewer, motifs.skewers.len());
    add(MotifKind::XRayAttack, motifs.xray_attacks.len());
    add(MotifKind::XRayDefense, motifs.xray_defenses.len());
    add(MotifKind::DiscoveredAttack, motifs.discovered_attacks.len());
    add(MotifKind::HangingPiece, motifs.hanging.len());
    add(MotifKind::TrappedPiece, motifs.trapped.len());
    add(MotifKind::OverloadedPiece, motifs.overloaded.len());
    add(MotifKind::CapturableDefender, motifs.capturable_defenders.len());
    add(MotifKind::BackRankWeakness, motifs.back_rank_weaknesses.len());
    add(MotifKind::ExposedKing, motifs.exposed_kings.len());
    add(MotifKind::MateThreat, motifs.mate_threats.len());
    add(MotifKind::MatePattern, motifs.mate_patterns.len());
    add(MotifKind::DoubleCheck, motifs.double_checks.len());
    ids
}

/// Squares a motif puts under pressure; chains hang off these.
fn compromised_squares(motifs: &TacticalMotifs, id: MotifId) -> Vec<Coord> {
    match id.kind {
        MotifKind::Pin => vec![motifs.pins[id.index].pinned.square],
        MotifKind::Fork => motifs.forks[id.index]
            .targets
            .iter()
            .map(|t| t.square)
            .collect(),
        MotifKind::Skewer => {
            let skewer = &motifs.skewers[id.index];
            vec![skewer.front.square, skewer.behind.square]
        }
        MotifKind::XRayAttack => vec![motifs.xray_attacks[id.index].target.square],
        MotifKind::DiscoveredAttack => vec![motifs.discovered_attacks[id.index].target.square],
        MotifKind::HangingPiece => vec![motifs.hanging[id.index].piece.square],
        MotifKind::TrappedPiece => vec![motifs.trapped[id.index].piece.square],
        MotifKind::OverloadedPiece => vec![motifs.overloaded[id.index].piece.square],
        MotifKind::CapturableDefender => {
            let motif = &motifs.capturable_defenders[id.index];
            vec![motif.defender.square, motif.charge.square]
        }
        _ => Vec::new(),
    }
}

/// The squares of the pieces doing the threatening in a motif.
fn actor_squares(motifs: &TacticalMotifs, id: MotifId) -> Vec<Coord> {
    match id.kind {
        MotifKind::Pin => vec![motifs.pins[id.index].pinner.square],
        MotifKind::Fork => vec![motifs.forks[id.index].forker.square],
        MotifKind::Skewer => vec![motifs.skewers[id.index].attacker.square],
        MotifKind::XRayAttack => vec![motifs.xray_attacks[id.index].attacker.square],
        MotifKind::XRayDefense => vec![motifs.xray_defenses[id.index].defender.square],
        MotifKind::DiscoveredAttack => vec![motifs.discovered_attacks[id.index].attacker.square],
        MotifKind::CapturableDefender => vec![motifs.capturable_defenders[id.index].attacker.square],
        MotifKind::BackRankWeakness => vec![motifs.back_rank_weaknesses[id.index].invader.square],
        MotifKind::MateThreat => vec![motifs.mate_threats[id.index].from],
        MotifKind::DoubleCheck => motifs.double_checks[id.index]
            .checkers
            .iter()
            .map(|c| c.square)
            .collect(),
        _ => Vec::new(),
    }
}

/// Reverse index from occupied squares to the motifs they participate in,
/// for downstream rendering. Only squares holding a piece in the source
/// position are indexed.
pub fn piece_index(motifs: &TacticalMotifs) -> HashMap<Coord, Vec<Involvement>> {
    let mut index: HashMap<Coord, Vec<Involvement>> = HashMap::new();
    let mut add = |square: Coord, motif: MotifId, role: InvolvementRole| {
        index.entry(square).or_default().push(Involvement { motif, role });
    };

    for (i, pin) in motifs.pins.iter().enumerate() {
        let id = MotifId { kind: MotifKind::Pin, index: i };
        add(pin.pinner.square, id, InvolvementRole::Attacker);
        add(pin.pinned.square, id, InvolvementRole::Target);
        add(pin.shielded.square, id, InvolvementRole::Shielded);
    }
    for (i, fork) in motifs.forks.iter().enumerate() {
        let id = MotifId { kind: MotifKind::Fork, index: i };
        add(fork.forker.square, id, InvolvementRole::Attacker);
        for target in &fork.targets {
            add(target.square, id, InvolvementRole::Target);
        }
    }
    for (i, skewer) in motifs.skewers.iter().enumerate() {
        let id = MotifId { kind: MotifKind::Skewer, index: i };
        add(skewer.attacker.square, id, InvolvementRole::Attacker);
        add(skewer.front.square, id, InvolvementRole::Target);
        add(skewer.behind.square, id, InvolvementRole::Shielded);
    }
    for (i, xray) in motifs.xray_attacks.iter().enumerate() {
        let id = MotifId { kind: MotifKind::XRayAttack, index: i };
        add(xray.attacker.square, id, InvolvementRole::Attacker);
        add(xray.through.square, id, InvolvementRole::Blocker);
        add(xray.target.square, id, InvolvementRole::Target);
    }
    for (i, xray) in motifs.xray_defenses.iter().enumerate() {
        let id = MotifId { kind: MotifKind::XRayDefense, index: i };
        add(xray.defender.square, id, InvolvementRole::Defender);
        add(xray.through.square, id, InvolvementRole::Blocker);
        add(xray.protected.square, id, InvolvementRole::Shielded);
    }
    for (i, disc) in motifs.discovered_attacks.iter().enumerate() {
        let id = MotifId { kind: MotifKind::DiscoveredAttack, index: i };
        add(disc.attacker.square, id, InvolvementRole::Attacker);
        add(disc.blocker.square, id, InvolvementRole::Blocker);
        add(disc.target.square, id, InvolvementRole::Target);
    }
    for (i, hanging) in motifs.hanging.iter().enumerate() {
        let id = MotifId { kind: MotifKind::HangingPiece, index: i };
        add(hanging.piece.square, id, InvolvementRole::Target);
    }
    for (i, trapped) in motifs.trapped.iter().enumerate() {
        let id = MotifId { kind: MotifKind::TrappedPiece, index: i };
        add(trapped.piece.square, id, InvolvementRole::Target);
    }
    for (i, overloaded) in motifs.overloaded.iter().enumerate() {
        let id = MotifId { kind: MotifKind::OverloadedPiece, index: i };
        add(overloaded.piece.square, id, InvolvementRole::Defender);
        for duty in &overloaded.duties {
            if duty.kind == crate::motifs::DutyKind::DefendPiece {
                add(duty.square, id, InvolvementRole::Target);
            }
        }
    }
    for (i, motif) in motifs.capturable_defenders.iter().enumerate() {
        let id = MotifId { kind: MotifKind::CapturableDefender, index: i };
        add(motif.defender.square, id, InvolvementRole::Defender);
        add(motif.charge.square, id, InvolvementRole::Target);
        add(motif.attacker.square, id, InvolvementRole::Attacker);
    }
    for (i, motif) in motifs.back_rank_weaknesses.iter().enumerate() {
        let id = MotifId { kind: MotifKind::BackRankWeakness, index: i };
        add(motif.king, id, InvolvementRole::King);
        add(motif.invader.square, id, InvolvementRole::Attacker);
    }
    for (i, motif) in motifs.exposed_kings.iter().enumerate() {
        let id = MotifId { kind: MotifKind::ExposedKing, index: i };
        add(motif.king, id, InvolvementRole::King);
    }
    for (i, motif) in motifs.mate_threats.iter().enumerate() {
        let id = MotifId { kind: MotifKind::MateThreat, index: i };
        add(motif.from, id, InvolvementRole::Attacker);
    }
    for (i, motif) in motifs.mate_patterns.iter().enumerate() {
        let id = MotifId { kind: MotifKind::MatePattern, index: i };
        add(motif.king, id, InvolvementRole::King);
    }
    for (i, motif) in motifs.double_checks.iter().enumerate() {
        let id = MotifId { kind: MotifKind::DoubleCheck, index: i };
        add(motif.king, id, InvolvementRole::King);
        for checker in &motif.checkers {
            add(checker.square, id, InvolvementRole::Attacker);
        }
    }

    index
}
