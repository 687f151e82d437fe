use rayon::prelude::*;

/*
  計算カーネル（バンド単位）

  バンドは (rows + 2) * stride のフラットなスライスで、
  ローカル行0と行rows+1がハロー行、行1..=rowsが自分の担当行。
  書き込み先を行単位で完全に分離することで、ロック不要の並列化を実現する。
*/

/// 5点ステンシルの平均化: next を cur から計算する（cur は読み取りのみ）
pub fn relax_band(cur: &[f64], next: &mut [f64], rows: usize, cols: usize) {
    let stride = cols + 2;

    // 担当行 (1..=rows) だけを切り出して行ごとに並列計算
    next[stride..(rows + 1) * stride]
        .par_chunks_mut(stride)
        .enumerate()
        .for_each(|(r, next_row)| {
            // rは切り出した領域の中での行番号 (0始まり)、バンド上の行は r + 1
            let i = r + 1;
            let up = &cur[(i - 1) * stride..i * stride];
            let mid = &cur[i * stride..(i + 1) * stride];
            let down = &cur[(i + 1) * stride..(i + 2) * stride];

            // 加算順序を固定してワーカー数によらずビット一致を保つ
            for j in 1..=cols {
                next_row[j] = 0.25 * (down[j] + up[j] + mid[j + 1] + mid[j - 1]);
            }
        });
}

/// 受理ステップ: 最大変化量 |next - cur| を測りながら next を cur に書き戻す
///
/// dtは必ずコピー前の cur と比較する（コピー後に比較すると常に0になる）
pub fn accept_band(cur: &mut [f64], next: &[f64], rows: usize, cols: usize) -> f64 {
    let stride = cols + 2;

    cur[stride..(rows + 1) * stride]
        .par_chunks_mut(stride)
        .enumerate()
        .map(|(r, cur_row)| {
            let i = r + 1;
            let next_row = &next[i * stride..(i + 1) * stride];

            let mut dt: f64 = 0.0;
            for j in 1..=cols {
                dt = dt.max((next_row[j] - cur_row[j]).abs());
                cur_row[j] = next_row[j];
            }
            dt
        })
        .reduce(|| 0.0, f64::max)
}
