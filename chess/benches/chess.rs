use arbiter::{
    draw::{DrawConfig, DrawManager},
    movegen, moves, state, Board, Color, Square,
};
use criterion::{black_box, criterion_group, criterion_main, Criterion};

const BOARDS: [(&str, &str); 8] = [
    (
        "initial",
        "rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq - 0 1",
    ),
    (
        "sicilian",
        "r1b1k2r/2qnbppp/p2ppn2/1p4B1/3NPPP1/2N2Q2/PPP4P/2KR1B1R w kq - 0 11",
    ),
    (
        "middle",
        "1rq1r1k1/1p3ppp/pB3n2/3ppP2/Pbb1P3/1PN2B2/2P2QPP/R1R4K w - - 1 21",
    ),
    (
        "kiwipete",
        "r3k2r/p1ppqpb1/bn2pnp1/3PN3/1p2P3/2N2Q1p/PPPBBPPP/R3K2R w KQkq - 0 1",
    ),
    (
        "open_position",
        "4r1k1/3R1ppp/8/5P2/p7/6PP/4pK2/1rN1B3 w - - 4 43",
    ),
    ("queen", "6K1/8/8/1k3q2/3Q4/8/8/8 w - - 0 1"),
    ("pawn_attack", "4k3/8/8/pppppppp/PPPPPPPP/8/8/4K3 w - - 0 1"),
    (
        "pawn_promote",
        "8/PPPPPPPP/8/2k1K3/8/8/pppppppp/8 w - - 0 1",
    ),
];

fn boards() -> impl Iterator<Item = (&'static str, Board)> {
    BOARDS
        .iter()
        .map(|&(name, fen)| (name, Board::from_fen(fen).unwrap()))
}

fn bench_semilegal(c: &mut Criterion) {
    let mut group = c.benchmark_group("semilegal");
    for (name, board) in boards() {
        group.bench_function(name, |b| {
            b.iter(|| black_box(movegen::semilegal(&board).len()))
        });
    }
}

fn bench_legal(c: &mut Criterion) {
    let mut group = c.benchmark_group("legal");
    for (name, board) in boards() {
        group.bench_function(name, |b| b.iter(|| black_box(movegen::legal(&board).len())));
    }
}

fn bench_make_unmake(c: &mut Criterion) {
    let mut group = c.benchmark_group("make_unmake");
    for (name, mut board) in boards() {
        let list = movegen::legal(&board);
        group.bench_function(name, |b| {
            b.iter(|| {
                for mv in &list {
                    let u = moves::make_move_unchecked(&mut board, *mv);
                    black_box(board.zobrist_hash());
                    moves::unmake_move_unchecked(&mut board, *mv, u);
                }
            })
        });
    }
}

fn bench_is_attacked(c: &mut Criterion) {
    let mut group = c.benchmark_group("is_attacked");
    for (name, board) in boards() {
        group.bench_function(name, |b| {
            b.iter(|| {
                for color in [Color::White, Color::Black] {
                    for sq in Square::iter() {
                        black_box(board.is_square_attacked(sq, color));
                    }
                }
            })
        });
    }
}

fn bench_status(c: &mut Criterion) {
    let mut group = c.benchmark_group("status");
    for (name, board) in boards() {
        group.bench_function(name, |b| b.iter(|| black_box(state::status(&board))));
    }
}

fn bench_draw_conditions(c: &mut Criterion) {
    let mut group = c.benchmark_group("draw_conditions");
    for (name, board) in boards() {
        let draws = DrawManager::new(&board, DrawConfig::default());
        group.bench_function(name, |b| {
            b.iter(|| black_box(draws.check_all_draw_conditions(&board).len()))
        });
    }
}

fn bench_perft(c: &mut Criterion) {
    let mut board = Board::initial();
    c.bench_function("perft_3", |b| {
        b.iter(|| black_box(movegen::perft(&mut board, 3)))
    });
}

criterion_group!(
    chess,
    bench_semilegal,
    bench_legal,
    bench_make_unmake,
    bench_is_attacked,
    bench_status,
    bench_draw_conditions,
    bench_perft,
);

criterion_main!(chess);
